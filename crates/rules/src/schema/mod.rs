//! On-disk rule schema types with serde deserialization.
//!
//! Field names follow the established rule-file format (`filters`,
//! `filtercondition`, `matchtype`, `listcondition`, `match_type`) so
//! existing rule sets load unchanged. These types are the raw, unvalidated
//! form; [`crate::compiled`] turns them into evaluable rules.

mod kind;
mod rule;

pub use kind::*;
pub use rule::*;
