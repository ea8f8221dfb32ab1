use std::path::PathBuf;

use clap::Parser;

use gcp_audit_core::Config;

/// Audit security properties of GCP projects.
///
/// Evaluates the rule files under the rules directory against saved API
/// snapshots and writes every finding to a JSON report. Flags override the
/// `GCP_AUDIT_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "gcp-audit", about = "Audit security properties of GCP projects")]
pub struct CliArgs {
    /// JSON file to read the checks from
    #[arg(short, long)]
    pub checks: Option<PathBuf>,

    /// File to write the report to (default: results.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing the rule definitions (default: rules)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Comma separated list of projects to audit (default: every project
    /// in the snapshot directory)
    #[arg(short, long, value_delimiter = ',')]
    pub projects: Option<Vec<String>>,

    /// Directory containing `<project>/<resource>.json` snapshots
    #[arg(short, long)]
    pub snapshots: Option<PathBuf>,

    /// Require every element of a sequence pattern to match
    #[arg(long)]
    pub strict_sequences: bool,

    /// Configuration profile selecting `{PROFILE}_GCP_AUDIT_*` variables
    #[arg(long, env = "GCP_AUDIT_PROFILE")]
    pub profile: Option<String>,
}

impl CliArgs {
    /// Environment configuration with the given flags applied on top.
    pub fn config(&self) -> Config {
        let base = match &self.profile {
            Some(profile) => Config::for_profile(profile),
            None => Config::from_env(),
        };
        self.apply(base)
    }

    fn apply(&self, mut config: Config) -> Config {
        if let Some(checks) = &self.checks {
            config.checks_file = Some(checks.clone());
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(rules) = &self.rules {
            config.rules_dir = rules.clone();
        }
        if let Some(snapshots) = &self.snapshots {
            config.snapshot_dir = snapshots.clone();
        }
        if let Some(projects) = &self.projects {
            config.projects = projects
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
        if self.strict_sequences {
            config.strict_sequences = true;
        }
        config
    }
}
