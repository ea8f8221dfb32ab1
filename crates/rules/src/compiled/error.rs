//! Errors raised while compiling a rule definition.

use crate::schema::MatchKind;

/// A malformed pattern or operand. Fatal to the rule it occurs in, never to
/// the audit run.
#[derive(Debug, thiserror::Error)]
pub enum RuleDefinitionError {
    /// `numeric` / `count` operand that is not `"<lt|gt|eq> <integer>"`.
    #[error("malformed {kind} operand '{operand}' at {path}: expected '<lt|gt|eq> <integer>'")]
    MalformedComparison {
        kind: MatchKind,
        operand: String,
        path: String,
    },

    /// `regex` operand that does not compile.
    #[error("invalid regex '{pattern}' at {path}: {source}")]
    InvalidRegex {
        pattern: String,
        path: String,
        #[source]
        source: regex::Error,
    },

    /// Non-string operand for a kind that compares text or parses operators.
    #[error("{kind} operand at {path} must be a string, found {found}")]
    NonStringOperand {
        kind: MatchKind,
        path: String,
        found: String,
    },

    /// Pattern node with no matching semantics (e.g. `null`).
    #[error("unsupported pattern node at {path}: {found}")]
    UnsupportedNode { path: String, found: String },

    /// Rule metadata that fails basic validation.
    #[error("invalid rule: {0}")]
    Invalid(String),
}
