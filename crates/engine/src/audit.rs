//! Audit orchestration: projects × checks → findings → report.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use gcp_audit_core::{AuditReport, Finding, Quantifier};
use gcp_audit_rules::{RuleEvaluator, RuleSet};

use crate::registry::ResolvedCheck;

/// Per-run counters, logged when the run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub projects: usize,
    /// (project, resource type) units whose rules were evaluated.
    pub checks_run: usize,
    pub fetch_failures: usize,
    pub rules_fired: usize,
    pub findings: usize,
}

impl AuditSummary {
    fn absorb(&mut self, unit: &UnitOutcome) {
        if unit.fetch_failed {
            self.fetch_failures += 1;
        } else if unit.evaluated {
            self.checks_run += 1;
        }
        self.rules_fired += unit.rules_fired;
        self.findings += unit.report.finding_count();
    }
}

/// Report and counters of one audit run.
#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    pub report: AuditReport,
    pub summary: AuditSummary,
}

/// Result of auditing one resource type of one project.
#[derive(Debug, Default)]
struct UnitOutcome {
    report: AuditReport,
    evaluated: bool,
    fetch_failed: bool,
    rules_fired: usize,
}

/// Runs every resolved check against every project.
///
/// Units are independent: each one fetches its collection, evaluates the
/// rules of its resource type and produces its own report subtree. Units run
/// on the rayon pool and their subtrees are merged afterwards in
/// (project, check) order.
pub struct Auditor {
    checks: Vec<ResolvedCheck>,
    rules: RuleSet,
    evaluator: RuleEvaluator,
}

impl Auditor {
    pub fn new(checks: Vec<ResolvedCheck>, rules: RuleSet, evaluator: RuleEvaluator) -> Self {
        Self {
            checks,
            rules,
            evaluator,
        }
    }

    /// Audit `projects`. Always completes; acquisition failures are logged
    /// and leave the affected subtree absent.
    pub fn run(&self, projects: &[String]) -> AuditOutcome {
        let start = Instant::now();
        info!(
            projects = projects.len(),
            checks = self.checks.len(),
            rules = self.rules.len(),
            "starting audit"
        );

        let units: Vec<(&str, &ResolvedCheck)> = projects
            .iter()
            .flat_map(|project| self.checks.iter().map(move |check| (project.as_str(), check)))
            .collect();

        let outcomes: Vec<UnitOutcome> = units
            .par_iter()
            .map(|(project, check)| self.audit_unit(project, check))
            .collect();

        let mut outcome = AuditOutcome {
            summary: AuditSummary {
                projects: projects.len(),
                ..AuditSummary::default()
            },
            ..AuditOutcome::default()
        };
        for unit in outcomes {
            outcome.summary.absorb(&unit);
            outcome.report.merge(unit.report);
        }

        let summary = &outcome.summary;
        info!(
            projects = summary.projects,
            checks_run = summary.checks_run,
            fetch_failures = summary.fetch_failures,
            rules_fired = summary.rules_fired,
            findings = summary.findings,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "audit complete"
        );
        outcome
    }

    fn audit_unit(&self, project: &str, check: &ResolvedCheck) -> UnitOutcome {
        let resource_type = check.resource_type.as_str();
        let rules = self.rules.rules_for(resource_type);
        if rules.is_empty() {
            debug!(project = %project, resource_type = %resource_type, "no rules, skipping fetch");
            return UnitOutcome::default();
        }

        let objects = match check.fetcher.fetch(project) {
            Ok(objects) => objects,
            Err(e) => {
                warn!(project = %project, resource_type = %resource_type, error = %e, "failed to fetch resources");
                return UnitOutcome {
                    fetch_failed: true,
                    ..UnitOutcome::default()
                };
            }
        };
        debug!(project = %project, resource_type = %resource_type, objects = objects.len(), "fetched resources");

        let mut unit = UnitOutcome {
            evaluated: true,
            ..UnitOutcome::default()
        };
        for rule in rules {
            let Some(findings) = self
                .evaluator
                .evaluate_rule(rule, &objects, &check.descfield)
            else {
                continue;
            };
            log_findings(project, resource_type, &rule.name, &findings);
            unit.rules_fired += 1;
            unit.report.record(project, resource_type, findings);
        }
        unit
    }
}

fn log_findings(project: &str, resource_type: &str, rule: &str, findings: &[Finding]) {
    for finding in findings {
        match finding.quantifier {
            Quantifier::None => error!(
                project = %project,
                resource_type = %resource_type,
                rule = %rule,
                "no object matches rule"
            ),
            _ => error!(
                project = %project,
                resource_type = %resource_type,
                object = %finding.descriptor().map(describe).unwrap_or_default(),
                rule = %rule,
                "object matches rule"
            ),
        }
    }
}

/// Strings print bare, other descriptors as JSON.
fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
