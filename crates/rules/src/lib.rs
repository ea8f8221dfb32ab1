//! Declarative audit rule engine.
//!
//! This crate provides:
//! - Rule definition schema with serde deserialization (JSON or YAML)
//! - Compilation of filter patterns into typed trees with pre-parsed operands
//! - Filesystem loader scoped per resource type
//! - Structural pattern matcher with exact/partial/regex/numeric/count leaves
//! - Clause combination (AND/OR) and rule quantifiers (any/all/none)

pub mod compiled;
pub mod evaluator;
pub mod loader;
pub mod schema;

pub use compiled::{CompiledRule, FilterClause, Operand, Pattern, RuleDefinitionError};
pub use evaluator::{EvalOptions, RuleEvaluator, SequenceSemantics};
pub use loader::{LoadResult, LoadStatus, RuleError, RuleLoader, RuleSet};
pub use schema::{ClauseDefinition, Condition, MatchKind, Quantifier, RuleDefinition};
