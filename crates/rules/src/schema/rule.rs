//! Rule and clause definitions as written in rule files.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{Condition, MatchKind, Quantifier};

/// One rule file: a named, ordered list of filter clauses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw quantifier. Unrecognised values fall back to `any`.
    #[serde(default, rename = "match_type", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    #[serde(default = "default_clause_condition", rename = "filtercondition")]
    pub clause_condition: Condition,
    #[serde(rename = "filters")]
    pub clauses: Vec<ClauseDefinition>,
}

/// One filter clause: a pattern tree plus the leaf operator family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClauseDefinition {
    #[serde(rename = "filter")]
    pub pattern: Value,
    #[serde(rename = "matchtype")]
    pub match_kind: MatchKind,
    #[serde(default = "default_list_condition", rename = "listcondition")]
    pub list_condition: Condition,
}

fn default_clause_condition() -> Condition {
    Condition::And
}

fn default_list_condition() -> Condition {
    Condition::Or
}

impl RuleDefinition {
    /// Resolve the rule's quantifier, defaulting to `any`.
    pub fn quantifier(&self) -> Quantifier {
        match self.match_type.as_deref() {
            None => Quantifier::Any,
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(rule = %self.name, error = %e, "falling back to match_type 'any'");
                Quantifier::Any
            }),
        }
    }
}
