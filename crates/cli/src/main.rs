mod cli;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use gcp_audit_core::{config, default_checks, load_checks};
use gcp_audit_engine::{Auditor, FetcherRegistry, PluginCache, SnapshotStore};
use gcp_audit_rules::{EvalOptions, RuleEvaluator, RuleLoader};

use crate::cli::CliArgs;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    config::load_dotenv();
    let args = CliArgs::parse();
    let config = args.config();
    config.log_summary();

    let checks = match &config.checks_file {
        Some(path) => load_checks(path)
            .with_context(|| format!("failed to load checks from {}", path.display()))?,
        None => default_checks(),
    };

    // Fetchers share one cache for the whole run.
    let store = Arc::new(SnapshotStore::new(config.snapshot_dir.clone()));
    let registry = FetcherRegistry::snapshots(Arc::clone(&store), Arc::new(PluginCache::new()));
    let resolved = registry
        .resolve(&checks)
        .context("invalid check configuration")?;

    let loader = RuleLoader::new(config.rules_dir.clone());
    if !loader.rules_dir().is_dir() {
        warn!(path = %loader.rules_dir().display(), "rules directory not found, no rules will be evaluated");
    }
    let (rules, results) = loader.load(checks.keys().map(String::as_str));
    let failed = results.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        warn!(failed, "some rule files could not be loaded");
    }

    let projects = if config.projects.is_empty() {
        store.list_projects().with_context(|| {
            format!("failed to list projects in {}", store.root().display())
        })?
    } else {
        config.projects.clone()
    };
    if projects.is_empty() {
        warn!("no projects to audit");
    }

    let evaluator = RuleEvaluator::new(EvalOptions::strict_sequences(config.strict_sequences));
    let outcome = Auditor::new(resolved, rules, evaluator).run(&projects);

    let json = outcome.report.to_json().context("failed to serialize report")?;
    fs::write(&config.output, json)
        .with_context(|| format!("failed to write report to {}", config.output.display()))?;
    info!(
        path = %config.output.display(),
        findings = outcome.summary.findings,
        "report written"
    );

    Ok(())
}
