//! Integration tests for the `dnscontroller` binary.
//!
//! Client commands run against a wiremock server; nothing here needs a
//! real dnscontroller server or touches the user's configuration.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORD_ID: &str = "52087acc-b0e9-4060-bc48-f37182b6becc";
const OWNER: &str = "bf9455c6-6987-4fdb-96ac-7f3f9dfabbe4";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
///
/// Clears all `DNSCONTROLLER_*` env vars and points the config file at
/// `config` so tests never read the user's real configuration.
fn dns_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dnscontroller");
    cmd.env("HOME", "/tmp/dnscontroller-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/dnscontroller-cli-test-nonexistent")
        .env("DNSCONTROLLER_CONFIG", config)
        .env_remove("DNSCONTROLLER_LISTEN")
        .env_remove("DNSCONTROLLER_DB__URI")
        .env_remove("DNSCONTROLLER_CLIENT__URL")
        .env_remove("DNSCONTROLLER_CLIENT__TIMEOUT")
        .env_remove("DNSCONTROLLER_LOGGING__JSON")
        .env_remove("DNSCONTROLLER_LOGGING__DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

fn isolated() -> (tempfile::TempDir, assert_cmd::Command) {
    let dir = tempfile::tempdir().unwrap();
    let cmd = dns_cmd(&dir.path().join("config.toml"));
    (dir, cmd)
}

fn record_body(answers: serde_json::Value) -> serde_json::Value {
    json!({
        "record": "example.com",
        "record_type": "A",
        "uuid": RECORD_ID,
        "created_at": "2026-01-02T03:04:05Z",
        "updated_at": "2026-01-02T03:04:05Z",
        "answers": answers,
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, mut cmd) = isolated();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");

    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, mut cmd) = isolated();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("serve")
            .and(predicate::str::contains("records"))
            .and(predicate::str::contains("answers")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, mut cmd) = isolated();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dnscontroller"));
}

#[test]
fn test_completions_zsh() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("custom.toml");

    dns_cmd(&dir.path().join("unused.toml"))
        .args(["config", "path", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_defaults() {
    let (_dir, mut cmd) = isolated();
    let output = cmd.args(["config", "show", "-o", "json"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(stdout.trim_end(), @r#"
    {
      "listen": "0.0.0.0:14000",
      "db": {
        "uri": "sqlite://dnscontroller.db"
      },
      "debug": {
        "sql": false,
        "http": false
      },
      "logging": {
        "debug": false,
        "json": false
      },
      "client": {
        "url": "http://127.0.0.1:14000",
        "timeout": 30
      }
    }
    "#);
}

#[test]
fn test_config_show_applies_env_and_flags() {
    let (_dir, mut cmd) = isolated();
    let output = cmd
        .env("DNSCONTROLLER_DB__URI", "sqlite://env.db")
        .args(["config", "show", "-o", "json", "--server", "http://dns.internal:8080"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["db"]["uri"], "sqlite://env.db");
    assert_eq!(shown["client"]["url"], "http://dns.internal:8080");
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");

    dns_cmd(&file).args(["config", "init"]).assert().success();
    let written = std::fs::read_to_string(&file).unwrap();
    assert!(written.contains("listen = \"0.0.0.0:14000\""));

    dns_cmd(&file)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    dns_cmd(&file)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "[client]\ntimeout = 0\n").unwrap();

    dns_cmd(&file)
        .args(["records", "get", "example.com", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("client.timeout"));
}

// ── Records ─────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_records_get_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body(json!([{
            "uuid": "0b7f8a3e-3f43-4a43-9a55-3a1c0fd1f3a0",
            "target": "1.1.2.1",
            "type": "A",
            "ttl": 300,
            "has_details": false,
            "owner_id": OWNER,
            "record_id": RECORD_ID,
        }]))))
        .mount(&server)
        .await;

    let (_dir, mut cmd) = isolated();
    cmd.args(["records", "get", "example.com", "A", "--server", &server.uri()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Record:   example.com")
                .and(predicate::str::contains("1.1.2.1"))
                .and(predicate::str::contains("300")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_records_get_plain_without_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body(json!([]))))
        .mount(&server)
        .await;

    let (_dir, mut cmd) = isolated();
    cmd.args(["-o", "plain", "records", "get", "example.com", "A"])
        .args(["--server", &server.uri()])
        .assert()
        .success()
        .stdout(format!("{RECORD_ID}\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_records_get_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records/missing.example.com/A"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "failed to find record",
            "error": "record not found: missing.example.com/A",
        })))
        .mount(&server)
        .await;

    let (_dir, mut cmd) = isolated();
    cmd.args(["records", "get", "missing.example.com", "A", "--server", &server.uri()])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_records_create_conflict_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "invalid record format",
            "error": "record already exists: example.com/A",
        })))
        .mount(&server)
        .await;

    let (_dir, mut cmd) = isolated();
    cmd.args(["records", "create", "example.com", "A", "--server", &server.uri()])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_unreachable_server_exit_code() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["records", "get", "example.com", "A"])
        .args(["--server", "http://127.0.0.1:1", "--timeout", "2"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}

// ── Answers ─────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_answers_add_plain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/records/example.com/A/answers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(record_body(json!([{
            "uuid": "0b7f8a3e-3f43-4a43-9a55-3a1c0fd1f3a0",
            "target": "1.1.2.1",
            "type": "A",
            "ttl": 3600,
            "has_details": false,
            "owner_id": OWNER,
            "record_id": RECORD_ID,
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, mut cmd) = isolated();
    cmd.args(["-o", "plain", "answers", "add", "example.com", "A"])
        .args(["--target", "1.1.2.1", "--owner", OWNER, "--server", &server.uri()])
        .assert()
        .success()
        .stdout("1.1.2.1\n");
}

#[test]
fn test_answers_add_rejects_unsupported_type() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["answers", "add", "example.com", "A"])
        .args(["--target", "mail.example.com", "--answer-type", "MX", "--owner", OWNER])
        .args(["--server", "http://127.0.0.1:1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported record type: MX"));
}

#[test]
fn test_answers_add_requires_owner() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["answers", "add", "example.com", "A", "--target", "1.1.2.1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--owner"));
}
