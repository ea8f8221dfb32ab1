//! Ordered clause combination for one object.

use serde_json::Value;

use crate::compiled::FilterClause;
use crate::schema::Condition;

use super::structural::{structurally_match, MatchContext};
use super::SequenceSemantics;

impl FilterClause {
    /// Match one object against this clause.
    pub fn matches(&self, object: &Value, semantics: SequenceSemantics) -> bool {
        let ctx = MatchContext {
            match_kind: self.match_kind,
            list_condition: self.list_condition,
            semantics,
        };
        structurally_match(object, &self.pattern, ctx)
    }
}

/// Apply `clauses` in order under `condition`.
///
/// `or` stops at the first matching clause, `and` at the first failing one.
/// An empty clause list matches under either condition.
pub fn evaluate_clauses(
    object: &Value,
    clauses: &[FilterClause],
    condition: Condition,
    semantics: SequenceSemantics,
) -> bool {
    condition.fold(
        true,
        clauses.iter().map(|clause| clause.matches(object, semantics)),
    )
}
