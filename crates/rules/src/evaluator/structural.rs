//! Recursive structural matching of a pattern tree against a resource value.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::compiled::Pattern;
use crate::schema::{Condition, MatchKind};

use super::matcher;
use super::SequenceSemantics;

/// Per-clause settings threaded through the recursion.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext {
    pub match_kind: MatchKind,
    pub list_condition: Condition,
    pub semantics: SequenceSemantics,
}

impl MatchContext {
    fn with_list_condition(self, list_condition: Condition) -> Self {
        Self {
            list_condition,
            ..self
        }
    }
}

/// Match `value` against `pattern`.
///
/// Dispatch is on the pair of shapes. A mapping pattern against a
/// non-mapping value is a shape mismatch and never matches.
pub fn structurally_match(value: &Value, pattern: &Pattern, ctx: MatchContext) -> bool {
    match (pattern, value) {
        (Pattern::Mapping(entries), Value::Object(fields)) => match_mapping(fields, entries, ctx),
        (Pattern::Mapping(_), _) => {
            trace!("shape mismatch: mapping pattern against non-mapping value");
            false
        }
        (Pattern::Sequence(patterns), Value::Array(items)) => match_sequences(items, patterns, ctx),
        (Pattern::Sequence(patterns), _) => ctx.list_condition.fold(
            true,
            patterns
                .iter()
                .map(|p| structurally_match(value, p, ctx)),
        ),
        (Pattern::Leaf(operand), _) => matcher::matches(value, operand),
    }
}

/// Every listed key must match; the first failing key stops evaluation.
fn match_mapping(
    fields: &serde_json::Map<String, Value>,
    entries: &IndexMap<String, Pattern>,
    ctx: MatchContext,
) -> bool {
    entries.iter().all(|(key, sub)| match fields.get(key) {
        Some(found) => match_field(found, sub, ctx),
        // A missing key counts as an empty sequence so count rules can
        // test for absence.
        None if ctx.match_kind == MatchKind::Count => {
            structurally_match(&Value::Array(Vec::new()), sub, ctx)
        }
        None => false,
    })
}

fn match_field(found: &Value, sub: &Pattern, ctx: MatchContext) -> bool {
    match (sub, found) {
        (Pattern::Sequence(_), Value::Array(_)) => structurally_match(found, sub, ctx),
        // Any element may satisfy the sub-pattern. This fold is always `or`
        // and nested matching falls back to the default list condition. An
        // empty sequence leaves the key unrefuted.
        (_, Value::Array(items)) => {
            let element_ctx = ctx.with_list_condition(Condition::Or);
            items.is_empty()
                || items
                    .iter()
                    .any(|item| structurally_match(item, sub, element_ctx))
        }
        _ => structurally_match(found, sub, ctx),
    }
}

/// Sequence pattern against sequence value. An empty value never matches.
fn match_sequences(items: &[Value], patterns: &[Pattern], ctx: MatchContext) -> bool {
    if items.is_empty() {
        return false;
    }

    let element_matches = |pattern: &Pattern| {
        ctx.list_condition.fold(
            true,
            items.iter().map(|item| structurally_match(item, pattern, ctx)),
        )
    };

    match ctx.semantics {
        // Only the final pattern element's result is reported.
        SequenceSemantics::LastPatternWins => patterns.last().map_or(true, element_matches),
        SequenceSemantics::EveryPattern => patterns.iter().all(element_matches),
    }
}
