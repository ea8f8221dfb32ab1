use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    profiled_env_opt(profile, key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

/// Split a comma separated list, dropping empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Directory holding one subdirectory of rule files per resource type.
    pub rules_dir: PathBuf,
    /// Directory holding `<project>/<resource>.json` snapshots.
    pub snapshot_dir: PathBuf,
    /// Report output path.
    pub output: PathBuf,
    /// Projects to audit; empty means every project in the snapshot store.
    pub projects: Vec<String>,
    /// Optional JSON checks file replacing the default check table.
    pub checks_file: Option<PathBuf>,
    /// Require every sequence pattern element to match on its own instead of
    /// reporting the last element's result.
    pub strict_sequences: bool,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `GCP_AUDIT_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("GCP_AUDIT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules_dir: PathBuf::from(profiled_env_or(p, "GCP_AUDIT_RULES_DIR", "rules")),
            snapshot_dir: PathBuf::from(profiled_env_or(p, "GCP_AUDIT_SNAPSHOT_DIR", "snapshots")),
            output: PathBuf::from(profiled_env_or(p, "GCP_AUDIT_OUTPUT", "results.json")),
            projects: profiled_env_opt(p, "GCP_AUDIT_PROJECTS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            checks_file: profiled_env_opt(p, "GCP_AUDIT_CHECKS").map(PathBuf::from),
            strict_sequences: profiled_env_bool(p, "GCP_AUDIT_STRICT_SEQUENCES", false),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:       dir={}", self.rules_dir.display());
        tracing::info!("  snapshots:   dir={}", self.snapshot_dir.display());
        tracing::info!("  output:      path={}", self.output.display());
        tracing::info!(
            "  projects:    {}",
            if self.projects.is_empty() { "(all in snapshot store)".to_string() } else { self.projects.join(",") }
        );
        tracing::info!(
            "  checks:      {}",
            self.checks_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(default)".to_string())
        );
        tracing::info!("  sequences:   strict={}", self.strict_sequences);
    }
}
