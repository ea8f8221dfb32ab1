//! The audit report: project id → resource-type id → ordered findings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::finding::Finding;

/// Findings for every resource type of one project.
pub type ProjectFindings = BTreeMap<String, Vec<Finding>>;

/// Aggregated result of an audit run.
///
/// Both mapping levels are `BTreeMap`s so the serialized form has sorted
/// keys. Consumers must still treat them as unordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditReport {
    projects: BTreeMap<String, ProjectFindings>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the findings of one fired rule.
    ///
    /// The `(project, resource_type)` subtree is created even when
    /// `findings` is empty: a rule that fired vacuously still marks the
    /// resource type as reported.
    pub fn record(&mut self, project: &str, resource_type: &str, findings: Vec<Finding>) {
        self.projects
            .entry(project.to_string())
            .or_default()
            .entry(resource_type.to_string())
            .or_default()
            .extend(findings);
    }

    /// Merge another report whose subtrees are disjoint from ours.
    ///
    /// Overlapping `(project, resource_type)` pairs are appended in order.
    pub fn merge(&mut self, other: AuditReport) {
        for (project, types) in other.projects {
            let target = self.projects.entry(project).or_default();
            for (resource_type, findings) in types {
                target.entry(resource_type).or_default().extend(findings);
            }
        }
    }

    pub fn project(&self, project: &str) -> Option<&ProjectFindings> {
        self.projects.get(project)
    }

    pub fn findings(&self, project: &str, resource_type: &str) -> Option<&[Finding]> {
        self.projects
            .get(project)
            .and_then(|types| types.get(resource_type))
            .map(Vec::as_slice)
    }

    pub fn projects(&self) -> impl Iterator<Item = (&String, &ProjectFindings)> {
        self.projects.iter()
    }

    /// Total number of findings across all projects and resource types.
    pub fn finding_count(&self) -> usize {
        self.projects
            .values()
            .flat_map(|types| types.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Serialize to JSON (sorted keys, compact).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
