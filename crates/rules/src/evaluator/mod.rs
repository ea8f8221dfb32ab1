//! Rule evaluation against fetched resource collections.
//!
//! Evaluation is layered:
//! - [`matcher`] compares one compiled operand against one value.
//! - [`structural`] walks a pattern tree against a resource tree.
//! - [`clauses`] combines a rule's clauses with AND/OR short-circuiting.
//! - [`RuleEvaluator`] applies a rule to every object of a collection and
//!   turns per-object matches into findings through the rule's quantifier.
//!
//! Nothing here mutates rules or resources, and nothing performs I/O.

mod clauses;
mod matcher;
mod structural;


use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use gcp_audit_core::{Finding, Quantifier, ResourceObject};

use crate::compiled::CompiledRule;

pub use clauses::evaluate_clauses;
pub use matcher::matches;
pub use structural::{structurally_match, MatchContext};

// ── Options ─────────────────────────────────────────────────────────

/// How a sequence pattern is quantified against a sequence value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceSemantics {
    /// Each pattern element is folded over the value's elements under the
    /// clause's list condition, and the result of the *last* pattern
    /// element is reported. Compatible with existing rule sets.
    #[default]
    LastPatternWins,
    /// Every pattern element must independently satisfy the list condition.
    EveryPattern,
}

/// Evaluation settings fixed for an audit run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    pub sequence_semantics: SequenceSemantics,
}

impl EvalOptions {
    pub fn strict_sequences(strict: bool) -> Self {
        Self {
            sequence_semantics: if strict {
                SequenceSemantics::EveryPattern
            } else {
                SequenceSemantics::LastPatternWins
            },
        }
    }
}

// ── Rule evaluator ──────────────────────────────────────────────────

/// Evaluates compiled rules against resource collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator {
    options: EvalOptions,
}

impl RuleEvaluator {
    pub fn new(options: EvalOptions) -> Self {
        Self { options }
    }

    /// Whether a single object satisfies the rule's clauses.
    pub fn object_matches(&self, rule: &CompiledRule, object: &Value) -> bool {
        evaluate_clauses(
            object,
            &rule.clauses,
            rule.clause_condition,
            self.options.sequence_semantics,
        )
    }

    /// Objects satisfying the rule's clauses, in collection order.
    pub fn matching_objects<'a>(
        &self,
        rule: &CompiledRule,
        objects: &'a [ResourceObject],
    ) -> Vec<&'a ResourceObject> {
        objects
            .iter()
            .filter(|object| self.object_matches(rule, object))
            .collect()
    }

    /// Evaluate one rule over a whole collection.
    ///
    /// Returns `None` when the rule does not fire. When it fires, returns its
    /// findings, which may be empty: `all` over an empty collection fires
    /// vacuously without citing any object.
    pub fn evaluate_rule(
        &self,
        rule: &CompiledRule,
        objects: &[ResourceObject],
        descriptor_field: &str,
    ) -> Option<Vec<Finding>> {
        let matches = self.matching_objects(rule, objects);
        trace!(
            rule = %rule.name,
            objects = objects.len(),
            matches = matches.len(),
            "evaluated rule clauses"
        );

        let fired = match rule.quantifier {
            Quantifier::Any => !matches.is_empty(),
            Quantifier::All => matches.len() == objects.len(),
            Quantifier::None => matches.is_empty(),
        };
        if !fired {
            return None;
        }

        let findings = match rule.quantifier {
            Quantifier::None => vec![Finding::absence(&rule.name)],
            quantifier => matches
                .into_iter()
                .map(|object| {
                    Finding::matched(
                        &rule.name,
                        quantifier,
                        descriptor(object, descriptor_field, &rule.name),
                        object.clone(),
                    )
                })
                .collect(),
        };
        Some(findings)
    }
}

/// Value of `field` on `object`, or `null` when absent.
fn descriptor(object: &Value, field: &str, rule: &str) -> Value {
    match object.get(field) {
        Some(value) => value.clone(),
        None => {
            debug!(rule = %rule, field = %field, "matched object has no descriptor field");
            Value::Null
        }
    }
}
