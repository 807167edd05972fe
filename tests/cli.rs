use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn rulesmith() -> Command {
    let mut cmd = Command::cargo_bin("waf-rulesmith").unwrap();
    for var in [
        "CLOUDFLARE_API_TOKEN",
        "CLOUDFLARE_ZONE_ID",
        "CLOUDFLARE_ACCOUNT_ID",
        "AI_MODEL",
        "REDIS_URL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn validate_accepts_known_field() {
    rulesmith()
        .args(["validate", "(http.request.uri.path eq \"/admin\")"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Expression is valid"));
}

#[test]
fn validate_fails_on_unbalanced_parentheses() {
    rulesmith()
        .args(["validate", "(foo eq 1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unbalanced parentheses"))
        .stdout(predicate::str::contains("verify syntax"));
}

#[test]
fn validate_json_output() {
    let output = rulesmith()
        .args(["validate", "--json", "   "])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["valid"], false);
    assert_eq!(result["errors"][0], "Expression cannot be empty");
}

#[test]
fn normalize_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "Try this:\n```\n(cf.threat_score gt 30)\n```\nIt will challenge risky visitors."
    )
    .unwrap();

    let output = rulesmith()
        .args(["normalize", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rule: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(rule["rule"], "(cf.threat_score gt 30)");
    assert_eq!(rule["action"], "challenge");
    assert_eq!(rule["confidence"], "medium");
}

#[test]
fn normalize_reads_stdin() {
    rulesmith()
        .arg("normalize")
        .write_stdin(r#"{"rule": "(ip.src eq 1.2.3.4)", "description": "one ip", "action": "block", "confidence": "low", "explanation": "x"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"confidence\": \"low\""));
}

#[test]
fn config_init_then_check() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rulesmith.toml");

    rulesmith()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    rulesmith()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    rulesmith()
        .args(["config", "check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking configuration"));
}

#[test]
fn config_check_missing_file() {
    rulesmith()
        .args(["config", "check", "--config", "/nonexistent/rulesmith.toml"])
        .assert()
        .failure();
}
