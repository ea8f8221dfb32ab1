//! Tests for the rule loader module.

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::schema::{Condition, MatchKind, Quantifier};

const FIREWALL_RULE_YAML: &str = r#"
name: ssh open to the world
description: ingress firewall rule allowing tcp/22 from 0.0.0.0/0
match_type: any
filtercondition: and
filters:
  - matchtype: exact
    filter:
      direction: INGRESS
  - matchtype: regex
    filter:
      sourceRanges: "0\\.0\\.0\\.0/0"
"#;

const CLOUDSQL_RULE_JSON: &str = r#"{
  "name": "cloudsql without backups",
  "match_type": "any",
  "filters": [
    {"matchtype": "exact", "filter": {"settings": {"backupConfiguration": {"enabled": false}}}}
  ]
}"#;

fn temp_loader() -> (TempDir, RuleLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = RuleLoader::new(dir.path().to_path_buf());
    (dir, loader)
}

fn write_rule(dir: &TempDir, resource_type: &str, file: &str, contents: &str) {
    let type_dir = dir.path().join(resource_type);
    fs::create_dir_all(&type_dir).unwrap();
    fs::write(type_dir.join(file), contents).unwrap();
}

#[test]
fn load_yaml_rule_from_file() {
    let (dir, loader) = temp_loader();
    write_rule(&dir, "firewalls", "ssh.yaml", FIREWALL_RULE_YAML);

    let rule = loader
        .load_file(&dir.path().join("firewalls/ssh.yaml"))
        .unwrap();
    assert_eq!(rule.name, "ssh open to the world");
    assert_eq!(rule.quantifier, Quantifier::Any);
    assert_eq!(rule.clause_condition, Condition::And);
    assert_eq!(rule.clauses.len(), 2);
    assert_eq!(rule.clauses[1].match_kind, MatchKind::Regex);
}

#[test]
fn load_json_rule_from_file() {
    let (dir, loader) = temp_loader();
    write_rule(&dir, "cloudsql", "backups.json", CLOUDSQL_RULE_JSON);

    let rule = loader
        .load_file(&dir.path().join("cloudsql/backups.json"))
        .unwrap();
    assert_eq!(rule.name, "cloudsql without backups");
    assert_eq!(rule.clauses.len(), 1);
}

#[test]
fn load_file_rejects_unknown_extension() {
    let (dir, loader) = temp_loader();
    write_rule(&dir, "firewalls", "ssh.toml", "name = 'x'");

    let err = loader
        .load_file(&dir.path().join("firewalls/ssh.toml"))
        .unwrap_err();
    assert!(matches!(err, RuleError::UnknownFormat(_)));
}

#[test]
fn load_groups_rules_by_resource_type() {
    let (dir, loader) = temp_loader();
    write_rule(&dir, "firewalls", "ssh.yaml", FIREWALL_RULE_YAML);
    write_rule(&dir, "cloudsql", "backups.json", CLOUDSQL_RULE_JSON);

    let (set, results) = loader.load(["firewalls", "cloudsql"]);

    assert_eq!(set.len(), 2);
    assert_eq!(set.rules_for("firewalls")[0].name, "ssh open to the world");
    assert_eq!(set.rules_for("cloudsql")[0].name, "cloudsql without backups");
    assert!(set.rules_for("iam").is_empty());
    assert!(results.iter().all(LoadResult::is_loaded));
}

#[test]
fn load_orders_rules_by_file_name() {
    let (dir, loader) = temp_loader();
    let named = |name: &str| FIREWALL_RULE_YAML.replace("ssh open to the world", name);
    write_rule(&dir, "firewalls", "b.yaml", &named("second"));
    write_rule(&dir, "firewalls", "c.json", CLOUDSQL_RULE_JSON);
    write_rule(&dir, "firewalls", "a.yml", &named("first"));

    let (set, _) = loader.load(["firewalls"]);
    let names: Vec<_> = set
        .rules_for("firewalls")
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second", "cloudsql without backups"]);
}

#[test]
fn load_skips_dotfiles_directories_and_other_files() {
    let (dir, loader) = temp_loader();
    write_rule(&dir, "firewalls", "ssh.yaml", FIREWALL_RULE_YAML);
    write_rule(&dir, "firewalls", ".hidden.yaml", FIREWALL_RULE_YAML);
    write_rule(&dir, "firewalls", "README.md", "# firewall rules");
    fs::create_dir_all(dir.path().join("firewalls/drafts")).unwrap();

    let (set, results) = loader.load(["firewalls"]);

    assert_eq!(set.len(), 1);
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(skipped, 3);
}

#[test]
fn load_reports_invalid_files_without_aborting() {
    let (dir, loader) = temp_loader();
    write_rule(&dir, "firewalls", "a-broken.yaml", "name: [unterminated");
    write_rule(
        &dir,
        "firewalls",
        "b-bad-count.yaml",
        r#"
name: bad count
filters:
  - matchtype: count
    filter:
      allowed: "about 3"
"#,
    );
    write_rule(&dir, "firewalls", "c-ssh.yaml", FIREWALL_RULE_YAML);

    let (set, results) = loader.load(["firewalls"]);

    assert_eq!(set.len(), 1);
    let failed: Vec<_> = results.iter().filter(|r| r.is_failed()).collect();
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().all(|r| r.resource_type == "firewalls"));
    match &failed[1].status {
        LoadStatus::Failed { error } => assert!(error.contains("about 3"), "{error}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn missing_resource_directory_yields_no_rules() {
    let (_dir, loader) = temp_loader();

    let (set, results) = loader.load(["buckets"]);

    assert!(set.is_empty());
    assert!(results.is_empty());
}
