//! Leaf operands with their operator strings parsed ahead of evaluation.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::schema::MatchKind;

use super::error::RuleDefinitionError;

/// Relational operator of a `numeric` / `count` operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Gt,
    Eq,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Eq => ordering == Ordering::Equal,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Lt => write!(f, "lt"),
            CompareOp::Gt => write!(f, "gt"),
            CompareOp::Eq => write!(f, "eq"),
        }
    }
}

/// A parsed `"<op> <int>"` operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub op: CompareOp,
    pub bound: i64,
}

impl Comparison {
    /// Parse exactly two whitespace-separated tokens: an operator and an integer.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split_whitespace();
        let (op, bound) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(op), Some(bound), None) => (op, bound),
            _ => return None,
        };
        let op = match op {
            "lt" => CompareOp::Lt,
            "gt" => CompareOp::Gt,
            "eq" => CompareOp::Eq,
            _ => return None,
        };
        Some(Self {
            op,
            bound: bound.parse().ok()?,
        })
    }

    pub fn holds_for_int(&self, value: i64) -> bool {
        self.op.holds(value.cmp(&self.bound))
    }

    /// Float comparison; `NaN` never satisfies any operator.
    pub fn holds_for_float(&self, value: f64) -> bool {
        value
            .partial_cmp(&(self.bound as f64))
            .is_some_and(|ordering| self.op.holds(ordering))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.bound)
    }
}

/// A compiled leaf of a filter pattern. The variant fixes the match kind.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Typed scalar compared for equality.
    Exact(Value),
    /// Substring searched for in a string value.
    Partial(String),
    /// Unanchored regex searched for in a string value.
    Regex(Regex),
    /// Comparison against a numeric value.
    Numeric(Comparison),
    /// Comparison against the length of a value.
    Count(Comparison),
}

impl Operand {
    /// Compile a scalar pattern leaf for `kind`. `path` locates the leaf in
    /// the pattern tree for error messages.
    pub fn compile(kind: MatchKind, raw: &Value, path: &str) -> Result<Self, RuleDefinitionError> {
        let text = || {
            raw.as_str().ok_or_else(|| RuleDefinitionError::NonStringOperand {
                kind,
                path: path.to_string(),
                found: raw.to_string(),
            })
        };
        let comparison = |text: &str| {
            Comparison::parse(text).ok_or_else(|| RuleDefinitionError::MalformedComparison {
                kind,
                operand: text.to_string(),
                path: path.to_string(),
            })
        };

        match kind {
            MatchKind::Exact => Ok(Operand::Exact(raw.clone())),
            MatchKind::Partial => Ok(Operand::Partial(text()?.to_string())),
            MatchKind::Regex => {
                let pattern = text()?;
                Regex::new(pattern)
                    .map(Operand::Regex)
                    .map_err(|source| RuleDefinitionError::InvalidRegex {
                        pattern: pattern.to_string(),
                        path: path.to_string(),
                        source,
                    })
            }
            MatchKind::Numeric => Ok(Operand::Numeric(comparison(text()?)?)),
            MatchKind::Count => Ok(Operand::Count(comparison(text()?)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comparison_parses_two_tokens() {
        assert_eq!(
            Comparison::parse("lt 10"),
            Some(Comparison { op: CompareOp::Lt, bound: 10 })
        );
        assert_eq!(
            Comparison::parse("  gt   -3 "),
            Some(Comparison { op: CompareOp::Gt, bound: -3 })
        );
        assert_eq!(Comparison::parse("eq 0").map(|c| c.to_string()), Some("eq 0".to_string()));
    }

    #[test]
    fn comparison_rejects_malformed() {
        for raw in ["", "lt", "lt 10 20", "le 10", "lt ten", "lt 1.5"] {
            assert_eq!(Comparison::parse(raw), None, "{raw:?} should not parse");
        }
    }

    #[test]
    fn comparison_float_handles_nan() {
        let cmp = Comparison::parse("lt 10").unwrap();
        assert!(cmp.holds_for_float(9.5));
        assert!(!cmp.holds_for_float(f64::NAN));
    }

    #[test]
    fn compile_rejects_non_string_for_text_kinds() {
        let err = Operand::compile(MatchKind::Regex, &json!(22), "$.ports").unwrap_err();
        assert!(matches!(err, RuleDefinitionError::NonStringOperand { .. }));
        assert!(err.to_string().contains("$.ports"));
    }

    #[test]
    fn compile_rejects_invalid_regex() {
        let err = Operand::compile(MatchKind::Regex, &json!("(unclosed"), "$").unwrap_err();
        assert!(matches!(err, RuleDefinitionError::InvalidRegex { .. }));
    }

    #[test]
    fn compile_rejects_malformed_count() {
        let err = Operand::compile(MatchKind::Count, &json!("at least 2"), "$.members").unwrap_err();
        assert!(matches!(err, RuleDefinitionError::MalformedComparison { kind: MatchKind::Count, .. }));
    }

    #[test]
    fn exact_keeps_typed_scalars() {
        let op = Operand::compile(MatchKind::Exact, &json!(true), "$").unwrap();
        assert!(matches!(op, Operand::Exact(Value::Bool(true))));
    }
}
