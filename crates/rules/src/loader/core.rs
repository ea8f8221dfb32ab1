//! Core [`RuleLoader`] struct: per-resource-type rule loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::compiled::CompiledRule;
use crate::schema::RuleDefinition;

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// Compiled rules keyed by resource-type id, each list in load order.
///
/// Loaded once before evaluation and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Vec<CompiledRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for `resource_type`.
    pub fn insert(&mut self, resource_type: &str, rule: CompiledRule) {
        self.rules
            .entry(resource_type.to_string())
            .or_default()
            .push(rule);
    }

    /// Rules for `resource_type`; empty when none were loaded.
    pub fn rules_for(&self, resource_type: &str) -> &[CompiledRule] {
        self.rules
            .get(resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of rules across all resource types.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filesystem-backed rule loader.
///
/// Reads `<rules_dir>/<resource_type>/*` for each requested resource type.
/// Files are visited in file-name order so the resulting rule order is
/// stable across platforms.
pub struct RuleLoader {
    /// Root directory containing one subdirectory per resource type.
    rules_dir: PathBuf,
}

impl RuleLoader {
    pub fn new(rules_dir: PathBuf) -> Self {
        Self { rules_dir }
    }

    /// Get the rules directory path.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Load the rules of every resource type in `resource_types`.
    ///
    /// Per-file failures are recorded in the returned [`LoadResult`]s and
    /// logged; they never abort the load. A missing resource-type directory
    /// yields no rules for that type.
    pub fn load<'a>(
        &self,
        resource_types: impl IntoIterator<Item = &'a str>,
    ) -> (RuleSet, Vec<LoadResult>) {
        let mut set = RuleSet::new();
        let mut results = Vec::new();

        for resource_type in resource_types {
            let dir = self.rules_dir.join(resource_type);
            let paths = match sorted_entries(&dir) {
                Ok(paths) => paths,
                Err(e) => {
                    warn!(resource_type = %resource_type, path = %dir.display(), error = %e, "failed to read rules directory");
                    continue;
                }
            };

            for path in paths {
                let status = self.load_entry(resource_type, &path, &mut set);
                results.push(LoadResult {
                    resource_type: resource_type.to_string(),
                    path,
                    status,
                });
            }
        }

        info!(
            rules = set.len(),
            failed = results.iter().filter(|r| r.is_failed()).count(),
            "rule loading complete"
        );
        (set, results)
    }

    fn load_entry(&self, resource_type: &str, path: &Path, set: &mut RuleSet) -> LoadStatus {
        if let Some(reason) = skip_reason(path) {
            debug!(path = %path.display(), reason = %reason, "skipping rules directory entry");
            return LoadStatus::Skipped { reason };
        }

        match self.load_file(path) {
            Ok(rule) => {
                let rule_name = rule.name.clone();
                debug!(resource_type = %resource_type, rule = %rule_name, path = %path.display(), "loaded rule");
                set.insert(resource_type, rule);
                LoadStatus::Loaded { rule_name }
            }
            Err(e) => {
                warn!(resource_type = %resource_type, path = %path.display(), error = %e, "failed to load rule file");
                LoadStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Parse and compile a single rule file, choosing the parser by extension.
    pub fn load_file(&self, path: &Path) -> Result<CompiledRule> {
        let format = RuleFormat::from_path(path)
            .ok_or_else(|| RuleError::UnknownFormat(path.to_path_buf()))?;
        let contents = fs::read_to_string(path)?;
        let definition = format.parse(&contents)?;
        Ok(CompiledRule::compile(&definition)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleFormat {
    Json,
    Yaml,
}

impl RuleFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(RuleFormat::Json),
            Some("yaml") | Some("yml") => Some(RuleFormat::Yaml),
            _ => None,
        }
    }

    fn parse(self, contents: &str) -> Result<RuleDefinition> {
        Ok(match self {
            RuleFormat::Json => serde_json::from_str(contents)?,
            RuleFormat::Yaml => serde_yaml::from_str(contents)?,
        })
    }
}

/// Directory entries sorted by file name.
fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

fn skip_reason(path: &Path) -> Option<String> {
    let is_dotfile = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    if is_dotfile {
        return Some("dotfile".to_string());
    }
    if path.is_dir() {
        return Some("directory".to_string());
    }
    if RuleFormat::from_path(path).is_none() {
        return Some("not a JSON or YAML file".to_string());
    }
    None
}
