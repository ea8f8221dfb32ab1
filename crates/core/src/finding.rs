use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One audited cloud resource as returned by a fetcher.
pub type ResourceObject = Value;

/// Rule-level policy turning per-object matches into a fire/no-fire decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantifier {
    /// Fires when at least one object matches.
    #[default]
    Any,
    /// Fires when every object matches (vacuously true for no objects).
    All,
    /// Fires when no object matches.
    None,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Any => write!(f, "any"),
            Quantifier::All => write!(f, "all"),
            Quantifier::None => write!(f, "none"),
        }
    }
}

impl FromStr for Quantifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Quantifier::Any),
            "all" => Ok(Quantifier::All),
            "none" => Ok(Quantifier::None),
            other => Err(format!("unknown match type: '{}'", other)),
        }
    }
}

/// The offending object cited by an `any` / `all` finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedObject {
    /// Value of the check's descriptor field (e.g. the resource name).
    /// `null` when the object has no such field.
    #[serde(rename = "object")]
    pub descriptor: Value,
    /// Full snapshot of the matched resource.
    #[serde(rename = "details")]
    pub snapshot: ResourceObject,
}

/// One reported rule violation.
///
/// Serializes with the field names of the established report format:
/// `{"match_type", "rule", "object", "details"}`, where the last two are
/// omitted for `none` findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "rule")]
    pub rule_name: String,
    #[serde(rename = "match_type")]
    pub quantifier: Quantifier,
    #[serde(flatten)]
    pub matched: Option<MatchedObject>,
}

impl Finding {
    /// Finding citing a matched object.
    pub fn matched(
        rule_name: impl Into<String>,
        quantifier: Quantifier,
        descriptor: Value,
        snapshot: ResourceObject,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            quantifier,
            matched: Some(MatchedObject {
                descriptor,
                snapshot,
            }),
        }
    }

    /// Finding carrying only rule identity (`none` rules have no offending object).
    pub fn absence(rule_name: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            quantifier: Quantifier::None,
            matched: None,
        }
    }

    /// Descriptor of the cited object, if any.
    pub fn descriptor(&self) -> Option<&Value> {
        self.matched.as_ref().map(|m| &m.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matched_finding_uses_report_field_names() {
        let finding = Finding::matched(
            "ssh open",
            Quantifier::Any,
            json!("default-allow-ssh"),
            json!({"name": "default-allow-ssh"}),
        );

        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(
            value,
            json!({
                "rule": "ssh open",
                "match_type": "any",
                "object": "default-allow-ssh",
                "details": {"name": "default-allow-ssh"},
            })
        );
    }

    #[test]
    fn absence_finding_omits_object_fields() {
        let value = serde_json::to_value(Finding::absence("deny-all present")).unwrap();
        assert_eq!(value, json!({"rule": "deny-all present", "match_type": "none"}));
    }

    #[test]
    fn quantifier_parses_lowercase_names() {
        assert_eq!("all".parse::<Quantifier>(), Ok(Quantifier::All));
        assert_eq!("none".parse::<Quantifier>(), Ok(Quantifier::None));
        assert!("some".parse::<Quantifier>().is_err());
        assert_eq!(Quantifier::default(), Quantifier::Any);
    }
}
