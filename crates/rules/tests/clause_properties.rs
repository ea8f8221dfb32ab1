//! Property-based tests for clause combination.
//!
//! Each generated clause is an `exact` match on one key of a fixed object,
//! so its individual result is known up front and the combined result can
//! be checked against plain boolean folds.

use gcp_audit_rules::{
    ClauseDefinition, CompiledRule, Condition, MatchKind, RuleDefinition, RuleEvaluator,
};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![Just(Condition::And), Just(Condition::Or)]
}

/// Intended result of each clause.
fn arb_outcomes() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 1..8)
}

fn subject() -> Value {
    json!({"direction": "INGRESS"})
}

fn clause(hit: bool) -> ClauseDefinition {
    let direction = if hit { "INGRESS" } else { "EGRESS" };
    ClauseDefinition {
        pattern: json!({ "direction": direction }),
        match_kind: MatchKind::Exact,
        list_condition: Condition::Or,
    }
}

fn rule(outcomes: &[bool], condition: Condition) -> CompiledRule {
    let definition = RuleDefinition {
        name: "generated".to_string(),
        description: None,
        match_type: None,
        clause_condition: condition,
        clauses: outcomes.iter().copied().map(clause).collect(),
    };
    CompiledRule::compile(&definition).unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn and_is_conjunction(outcomes in arb_outcomes()) {
        let matched = RuleEvaluator::default().object_matches(&rule(&outcomes, Condition::And), &subject());
        prop_assert_eq!(matched, outcomes.iter().all(|&o| o));
    }

    #[test]
    fn or_is_disjunction(outcomes in arb_outcomes()) {
        let matched = RuleEvaluator::default().object_matches(&rule(&outcomes, Condition::Or), &subject());
        prop_assert_eq!(matched, outcomes.iter().any(|&o| o));
    }

    #[test]
    fn single_clause_passes_through(hit in any::<bool>(), condition in arb_condition()) {
        let matched = RuleEvaluator::default().object_matches(&rule(&[hit], condition), &subject());
        prop_assert_eq!(matched, hit);
    }

    #[test]
    fn evaluation_is_repeatable(outcomes in arb_outcomes(), condition in arb_condition()) {
        let rule = rule(&outcomes, condition);
        let evaluator = RuleEvaluator::default();
        let objects = vec![subject(), json!({"direction": "EGRESS"})];
        prop_assert_eq!(
            evaluator.evaluate_rule(&rule, &objects, "direction"),
            evaluator.evaluate_rule(&rule, &objects, "direction")
        );
    }
}
