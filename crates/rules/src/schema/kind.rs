//! Operator enums shared by the schema and the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use gcp_audit_core::Quantifier;

/// Leaf comparison family applied by a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
    Regex,
    Numeric,
    Count,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Partial => write!(f, "partial"),
            MatchKind::Regex => write!(f, "regex"),
            MatchKind::Numeric => write!(f, "numeric"),
            MatchKind::Count => write!(f, "count"),
        }
    }
}

impl FromStr for MatchKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchKind::Exact),
            "partial" => Ok(MatchKind::Partial),
            "regex" => Ok(MatchKind::Regex),
            "numeric" => Ok(MatchKind::Numeric),
            "count" => Ok(MatchKind::Count),
            other => Err(format!("unknown match kind: '{}'", other)),
        }
    }
}

/// AND/OR combinator used between clauses and between sequence elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    And,
    Or,
}

impl Condition {
    /// Whether `result` settles the combination so no further operand
    /// needs evaluating: `or` settles on the first true, `and` on the
    /// first false.
    pub fn short_circuits(self, result: bool) -> bool {
        match self {
            Condition::Or => result,
            Condition::And => !result,
        }
    }

    /// Fold `results` left to right, stopping as soon as one settles the
    /// combination. The value is the last result evaluated, or `initial`
    /// when there are none.
    pub fn fold(self, initial: bool, results: impl IntoIterator<Item = bool>) -> bool {
        let mut last = initial;
        for result in results {
            last = result;
            if self.short_circuits(result) {
                break;
            }
        }
        last
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::And => write!(f, "and"),
            Condition::Or => write!(f, "or"),
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "and" => Ok(Condition::And),
            "or" => Ok(Condition::Or),
            other => Err(format!("unknown condition: '{}'", other)),
        }
    }
}
