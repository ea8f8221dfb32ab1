//! Leaf comparison of one operand against one resource value.
//!
//! Shape or type disagreements (a regex against a number, a partial match
//! against a list) are non-matches, never errors.

use serde_json::Value;

use crate::compiled::{Comparison, Operand};

/// Evaluate a compiled leaf `operand` against `value`.
pub fn matches(value: &Value, operand: &Operand) -> bool {
    match operand {
        Operand::Exact(expected) => value == expected,
        Operand::Partial(needle) => value.as_str().is_some_and(|s| s.contains(needle.as_str())),
        Operand::Regex(re) => value.as_str().is_some_and(|s| re.is_match(s)),
        Operand::Numeric(cmp) => numeric_holds(value, cmp),
        Operand::Count(cmp) => cmp.holds_for_int(element_count(value)),
    }
}

fn numeric_holds(value: &Value, cmp: &Comparison) -> bool {
    let Value::Number(n) = value else {
        return false;
    };
    match n.as_i64() {
        Some(i) => cmp.holds_for_int(i),
        None => n.as_f64().is_some_and(|f| cmp.holds_for_float(f)),
    }
}

/// Sequences count their elements; any other value counts as one.
fn element_count(value: &Value) -> i64 {
    match value {
        Value::Array(items) => i64::try_from(items.len()).unwrap_or(i64::MAX),
        _ => 1,
    }
}
