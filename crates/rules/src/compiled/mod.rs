//! Evaluable rules compiled from [`RuleDefinition`]s.
//!
//! Compilation happens once at load time: pattern trees become typed
//! [`Pattern`]s, regexes are built and `"<op> <int>"` operands are parsed.
//! Any failure is a [`RuleDefinitionError`] scoped to the one rule.

mod error;
mod operand;
mod pattern;

pub use error::RuleDefinitionError;
pub use operand::{CompareOp, Comparison, Operand};
pub use pattern::Pattern;

use crate::schema::{ClauseDefinition, Condition, MatchKind, Quantifier, RuleDefinition};

/// One compiled filter clause.
#[derive(Debug, Clone)]
pub struct FilterClause {
    pub pattern: Pattern,
    pub match_kind: MatchKind,
    /// Quantification inside sequence-vs-sequence matching for this clause.
    pub list_condition: Condition,
}

impl FilterClause {
    pub fn compile(def: &ClauseDefinition) -> Result<Self, RuleDefinitionError> {
        Ok(Self {
            pattern: Pattern::compile(def.match_kind, &def.pattern)?,
            match_kind: def.match_kind,
            list_condition: def.list_condition,
        })
    }
}

/// A rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub clauses: Vec<FilterClause>,
    pub clause_condition: Condition,
    pub quantifier: Quantifier,
}

impl CompiledRule {
    pub fn compile(def: &RuleDefinition) -> Result<Self, RuleDefinitionError> {
        if def.name.trim().is_empty() {
            return Err(RuleDefinitionError::Invalid(
                "rule name must not be empty".to_string(),
            ));
        }

        let clauses = def
            .clauses
            .iter()
            .map(FilterClause::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: def.name.clone(),
            clauses,
            clause_condition: def.clause_condition,
            quantifier: def.quantifier(),
        })
    }
}

impl TryFrom<&RuleDefinition> for CompiledRule {
    type Error = RuleDefinitionError;

    fn try_from(def: &RuleDefinition) -> Result<Self, Self::Error> {
        Self::compile(def)
    }
}
