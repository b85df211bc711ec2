#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn scguard_cmd() -> Command {
    Command::cargo_bin("scguard").expect("binary should be built")
}

fn assess_cmd(facts: &str, probabilities: &str) -> Command {
    let mut cmd = scguard_cmd();
    cmd.arg("assess")
        .arg(fixture(facts))
        .arg("--probabilities")
        .arg(fixture(probabilities));
    cmd
}

fn assess_json(facts: &str, probabilities: &str) -> serde_json::Value {
    let output = assess_cmd(facts, probabilities)
        .output()
        .expect("command should run");
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

#[test]
fn low_probabilities_exit_0() {
    assess_cmd("token_facts.json", "probs_low.json").assert().code(0);
}

#[test]
fn moderate_probabilities_exit_1() {
    assess_cmd("vault_facts.json", "probs_moderate.json").assert().code(1);
}

#[test]
fn high_probabilities_exit_2() {
    assess_cmd("vault_facts.json", "probs_high.json").assert().code(2);
}

#[test]
fn strict_profile_blocks_moderate_risk() {
    assess_cmd("vault_facts.json", "probs_moderate.json")
        .arg("--config")
        .arg(fixture("strict_profile.toml"))
        .assert()
        .code(2);
}

#[test]
fn json_output_is_valid() {
    let parsed = assess_json("vault_facts.json", "probs_moderate.json");

    assert!(parsed.get("schema_version").is_some());
    assert!(parsed.get("tool").is_some());
    assert!(parsed.get("input").is_some());
    assert!(parsed.get("features").is_some());
    assert!(parsed.get("feature_vector").is_some());
    assert!(parsed.get("graph").is_some());
    assert!(parsed.get("analysis").is_some());
    assert!(parsed.get("risk").is_some());
    assert!(parsed.get("enforcement").is_some());
}

#[test]
fn json_enforcement_for_moderate_risk() {
    let parsed = assess_json("vault_facts.json", "probs_moderate.json");

    assert_eq!(parsed["enforcement"]["decision"], "WARN");
    assert_eq!(parsed["enforcement"]["risk_category"], "MEDIUM");
    assert_eq!(
        parsed["enforcement"]["detected_vulnerabilities"],
        serde_json::json!(["reentrancy"])
    );
    assert_eq!(parsed["risk"]["top_risk_factors"][0], "reentrancy (prob=0.90)");
}

#[test]
fn json_features_reflect_the_facts() {
    let parsed = assess_json("vault_facts.json", "probs_low.json");

    assert_eq!(parsed["features"]["external_call_count"], 1);
    assert_eq!(parsed["features"]["has_cycle_with_external_call"], true);
    assert_eq!(parsed["feature_vector"].as_array().unwrap().len(), 16);
    assert_eq!(parsed["graph"]["functions_in_cycles"], serde_json::json!(["Vault.withdraw"]));
    assert_eq!(parsed["analysis"]["status"], "ok");
}

#[test]
fn json_schema_version_present() {
    let parsed = assess_json("token_facts.json", "probs_low.json");
    assert_eq!(parsed["schema_version"], "0.1.0");
}

#[test]
fn json_tool_info_reflects_binary() {
    let parsed = assess_json("token_facts.json", "probs_low.json");

    assert_eq!(parsed["tool"]["name"], "scguard-cli");
    assert_eq!(parsed["tool"]["version"], "0.1.0");
    assert!(parsed["tool"]["commit"].is_null());
}

#[test]
fn commit_is_recorded() {
    let output = assess_cmd("token_facts.json", "probs_low.json")
        .arg("--commit")
        .arg("abc123")
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["tool"]["commit"], "abc123");
}

#[test]
fn json_input_has_hash() {
    let parsed = assess_json("token_facts.json", "probs_low.json");

    assert_eq!(parsed["input"]["hash"]["algorithm"], "sha256");
    let hash = parsed["input"]["hash"]["value"].as_str().unwrap();
    assert_eq!(hash.len(), 64, "SHA-256 hex should be 64 chars");
}

#[test]
fn importance_adds_risk_factors() {
    let output = assess_cmd("vault_facts.json", "probs_moderate.json")
        .arg("--importance")
        .arg(fixture("importance.json"))
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed["risk"]["top_risk_factors"],
        serde_json::json!([
            "reentrancy (prob=0.90)",
            "has_cycle_with_external_call (importance=0.35)",
            "state_writes_after_call (importance=0.22)",
            "external_call_count (importance=0.18)"
        ])
    );
}

#[test]
fn text_output_contains_decision() {
    assess_cmd("token_facts.json", "probs_low.json")
        .arg("--format")
        .arg("text")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Decision: ALLOW"))
        .stdout(predicate::str::contains("1. No specific recommendations."));
}

#[test]
fn text_output_shows_detected_vulnerabilities() {
    assess_cmd("vault_facts.json", "probs_high.json")
        .arg("--format")
        .arg("text")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Decision: BLOCK"))
        .stdout(predicate::str::contains("reentrancy (95%)"))
        .stdout(predicate::str::contains("Deployment blocked"))
        .stdout(predicate::str::contains("5. "));
}

#[test]
fn output_to_file() {
    let tmp = NamedTempFile::new().unwrap();

    assess_cmd("token_facts.json", "probs_low.json")
        .arg("--out")
        .arg(tmp.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(tmp.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["enforcement"]["decision"], "ALLOW");
}

#[test]
fn features_subcommand_prints_vector() {
    let output = scguard_cmd()
        .arg("features")
        .arg(fixture("token_facts.json"))
        .output()
        .expect("command should run");

    assert_eq!(output.status.code(), Some(0));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["has_access_control_modifier"], true);
    assert_eq!(parsed["has_reentrancy_guard"], true);
    assert_eq!(parsed["max_call_depth"], 1);
}

#[test]
fn features_per_contract() {
    let output = scguard_cmd()
        .arg("features")
        .arg(fixture("vault_facts.json"))
        .arg("--per-contract")
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = parsed.as_array().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0]["contract"], "Vault");
    assert_eq!(outcomes[0]["result"]["features"]["external_call_count"], 1);
}

#[test]
fn nonexistent_facts_file_fails() {
    scguard_cmd()
        .arg("assess")
        .arg("/tmp/nonexistent_scguard_facts.json")
        .arg("--probabilities")
        .arg(fixture("probs_low.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to read fact document"));
}

#[test]
fn malformed_probabilities_fail() {
    let mut tmp = NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut tmp, b"{\"overflow\": 0.4}").unwrap();

    scguard_cmd()
        .arg("assess")
        .arg(fixture("token_facts.json"))
        .arg("--probabilities")
        .arg(tmp.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("malformed probability document"));
}

#[test]
fn missing_probabilities_flag_is_a_usage_error() {
    scguard_cmd()
        .arg("assess")
        .arg(fixture("token_facts.json"))
        .assert()
        .code(3);
}

#[test]
fn verbose_logs_go_to_stderr() {
    let output = assess_cmd("token_facts.json", "probs_low.json")
        .arg("--verbose")
        .env_remove("RUST_LOG")
        .output()
        .expect("command should run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("policy enforced"));
    serde_json::from_slice::<serde_json::Value>(&output.stdout).expect("stdout stays JSON");
}
