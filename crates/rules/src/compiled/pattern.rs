//! Filter pattern trees compiled from raw rule values.

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::MatchKind;

use super::error::RuleDefinitionError;
use super::operand::Operand;

/// A compiled filter pattern node, mirroring the shape of a resource object.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Key → sub-pattern, evaluated in the order written. Resource keys not
    /// listed here are ignored.
    Mapping(IndexMap<String, Pattern>),
    /// Ordered sub-patterns matched against a resource sequence.
    Sequence(Vec<Pattern>),
    /// A compiled leaf operand.
    Leaf(Operand),
}

impl Pattern {
    /// Compile a raw pattern tree, parsing every leaf for `kind`.
    pub fn compile(kind: MatchKind, raw: &Value) -> Result<Self, RuleDefinitionError> {
        compile_node(kind, raw, "$")
    }
}

fn compile_node(kind: MatchKind, raw: &Value, path: &str) -> Result<Pattern, RuleDefinitionError> {
    match raw {
        Value::Object(entries) => entries
            .iter()
            .map(|(key, sub)| {
                let sub_path = format!("{}.{}", path, key);
                compile_node(kind, sub, &sub_path).map(|p| (key.clone(), p))
            })
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Pattern::Mapping),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, sub)| compile_node(kind, sub, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Pattern::Sequence),
        Value::Null => Err(RuleDefinitionError::UnsupportedNode {
            path: path.to_string(),
            found: "null".to_string(),
        }),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Operand::compile(kind, raw, path).map(Pattern::Leaf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compiles_nested_shapes_in_key_order() {
        let raw = json!({
            "sourceRanges": "0.0.0.0/0",
            "allowed": [{"protocol": "tcp|udp", "ports": ".+"}],
        });
        let pattern = Pattern::compile(MatchKind::Regex, &raw).unwrap();

        let Pattern::Mapping(entries) = pattern else {
            panic!("expected mapping");
        };
        let keys: Vec<_> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["sourceRanges", "allowed"]);
        assert!(matches!(entries["sourceRanges"], Pattern::Leaf(_)));
        match &entries["allowed"] {
            Pattern::Sequence(items) => {
                assert_eq!(items.len(), 1);
                assert!(matches!(items[0], Pattern::Mapping(_)));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn null_leaf_is_rejected_with_path() {
        let raw = json!({"settings": {"tier": null}});
        let err = Pattern::compile(MatchKind::Exact, &raw).unwrap_err();
        assert!(matches!(err, RuleDefinitionError::UnsupportedNode { .. }));
        assert!(err.to_string().contains("$.settings.tier"));
    }

    #[test]
    fn leaf_errors_report_sequence_index() {
        let raw = json!({"members": ["gt 1", "many"]});
        let err = Pattern::compile(MatchKind::Count, &raw).unwrap_err();
        assert!(err.to_string().contains("$.members[1]"), "{err}");
    }
}
