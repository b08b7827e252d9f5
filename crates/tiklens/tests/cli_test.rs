//! Integration tests for the `tiklens` CLI binary.
//!
//! Argument parsing, help output, completions, offline comparison of export
//! documents, and proxied acquisition against a mock intermediary.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const ISOLATED_HOME: &str = "/tmp/tiklens-cli-test-nonexistent";

/// Build a [`Command`] for the `tiklens` binary with env isolation.
///
/// Clears all `TIKLENS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tiklens_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tiklens");
    cmd.env("HOME", ISOLATED_HOME)
        .env("XDG_CONFIG_HOME", ISOLATED_HOME)
        .env("NO_COLOR", "1")
        .env_remove("TIKLENS_CONFIG")
        .env_remove("TIKLENS_MODE")
        .env_remove("TIKLENS_BACKEND")
        .env_remove("TIKLENS_OUTPUT")
        .env_remove("TIKLENS_TIMEOUT")
        .env_remove("TIKLENS_PASSWORD")
        .env_remove("TIKLENS_PRIMARY_PASSWORD")
        .env_remove("TIKLENS_SECONDARY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_document(dir: &Path, file: &str, name: &str, entries: Value) -> String {
    let doc = json!({
        "router": {
            "id": "1",
            "name": name,
            "host": "192.168.88.1",
            "username": "admin",
            "password": ""
        },
        "timestamp": "2024-05-01T12:00:00.000Z",
        "addressLists": entries,
        "firewallRules": [
            { ".id": "*1", "chain": "forward", "action": "drop", "dst-address-list": "bl" }
        ]
    });
    let path = dir.join(file);
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path.to_str().unwrap().to_owned()
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tiklens_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tiklens_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("RouterOS")
            .and(predicate::str::contains("connect"))
            .and(predicate::str::contains("export"))
            .and(predicate::str::contains("compare")),
    );
}

#[test]
fn test_version_flag() {
    tiklens_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tiklens"));
}

#[test]
fn test_invalid_subcommand() {
    tiklens_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_completions_bash() {
    tiklens_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tiklens"));
}

#[test]
fn test_config_path_honors_flag() {
    tiklens_cmd()
        .args(["--config", "/tmp/tiklens-elsewhere.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/tiklens-elsewhere.toml"));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_connect_without_host_is_a_usage_error() {
    let output = tiklens_cmd()
        .args(["connect", "--username", "admin", "--password", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("host"), "{text}");
}

#[test]
fn test_proxied_mode_requires_backend() {
    let output = tiklens_cmd()
        .args(["--mode", "proxied", "connect", "-H", "10.0.0.1", "-u", "admin"])
        .args(["--password", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_file_and_host_flags_conflict() {
    tiklens_cmd()
        .args(["compare", "--primary-file", "a.json", "--primary-host", "10.0.0.1"])
        .assert()
        .failure()
        .code(2);
}

// ── Offline compare ─────────────────────────────────────────────────

#[test]
fn test_compare_two_export_documents() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_document(
        dir.path(),
        "a.json",
        "Edge",
        json!([{ ".id": "*1", "list": "wl", "address": "1.1.1.1" }]),
    );
    let second = write_document(
        dir.path(),
        "b.json",
        "Backup",
        json!([
            { ".id": "*9", "list": "wl", "address": "1.1.1.1", "comment": "same entry" },
            { ".id": "*2", "list": "bl", "address": "2.2.2.2" }
        ]),
    );

    let output = tiklens_cmd()
        .args(["-o", "json", "compare", "--primary-file", &first])
        .args(["--secondary-file", &second])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["onlyInFirst"], json!([]));
    assert_eq!(body["onlyInSecond"], json!(["bl:2.2.2.2"]));
    assert_eq!(body["totalDifferences"], 1);
    assert_eq!(body["first"]["name"], "Edge");
}

#[test]
fn test_compare_plain_with_details() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_document(dir.path(), "a.json", "Edge", json!([]));
    let second = write_document(
        dir.path(),
        "b.json",
        "Backup",
        json!([{ ".id": "*2", "list": "bl", "address": "2.2.2.2" }]),
    );

    tiklens_cmd()
        .args(["-o", "plain", "compare", "--details"])
        .args(["--primary-file", &first, "--secondary-file", &second])
        .assert()
        .success()
        .stdout(predicate::str::diff("+bl:2.2.2.2\n"));
}

#[test]
fn test_compare_rejects_a_broken_document() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{}").unwrap();
    let good = write_document(dir.path(), "b.json", "Backup", json!([]));

    tiklens_cmd()
        .args(["compare", "--primary-file", bad.to_str().unwrap()])
        .args(["--secondary-file", &good])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not an export document"));
}

// ── Proxied acquisition ─────────────────────────────────────────────

#[test]
fn test_unreachable_backend_exits_with_connection_code() {
    let output = tiklens_cmd()
        .args(["--mode", "proxied", "--backend", "http://127.0.0.1:1"])
        .args(["--on-failure", "error", "--timeout", "5"])
        .args(["connect", "-H", "10.0.0.1", "-u", "admin", "--password", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_proxied_connect_renders_router_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .and(body_json(json!({
            "host": "10.0.0.1",
            "username": "admin",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "addressLists": [{ ".id": "*1", "list": "wl", "address": "1.1.1.1" }],
                "firewallRules": [{ ".id": "*1", "chain": "input", "action": "accept" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = tiklens_cmd();
    cmd.env("TIKLENS_PASSWORD", "s3cret")
        .args(["--mode", "proxied", "--backend", &server.uri(), "-o", "json"])
        .args(["connect", "-H", "10.0.0.1", "-u", "admin"]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["origin"], "live");
    assert_eq!(body["addressLists"][0]["address"], "1.1.1.1");
    assert_eq!(body["firewallRules"][0]["action"], "accept");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_proxied_failure_falls_back_to_demo_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "login failure"
        })))
        .mount(&server)
        .await;

    let mut cmd = tiklens_cmd();
    cmd.args(["--mode", "proxied", "--backend", &server.uri()])
        .args(["--on-failure", "fallback", "-o", "plain", "connect"])
        .args(["-H", "10.0.0.1", "-u", "admin", "--password", "x"])
        .args(["--view", "address-lists"]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "whitelist\t192.168.1.100\nblacklist\t10.0.0.50\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("showing demo data"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_proxied_failure_surfaces_server_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "router exploded"
        })))
        .mount(&server)
        .await;

    let mut cmd = tiklens_cmd();
    cmd.args(["--mode", "proxied", "--backend", &server.uri()])
        .args(["--on-failure", "error", "export", "--stdout"])
        .args(["-H", "10.0.0.1", "-u", "admin", "--password", "x"]);
    let output = run_blocking(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("router exploded"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_backend_exits_with_timeout_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "success": true,
                    "data": { "addressLists": [], "firewallRules": [] }
                }))
                .set_delay(std::time::Duration::from_secs(4)),
        )
        .mount(&server)
        .await;

    let mut cmd = tiklens_cmd();
    cmd.args(["--mode", "proxied", "--backend", &server.uri()])
        .args(["--on-failure", "error", "--timeout", "1", "connect"])
        .args(["-H", "10.0.0.1", "-u", "admin", "--password", "x"]);
    let output = run_blocking(cmd).await;
    assert_eq!(output.status.code(), Some(8), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timed out after 1s"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_proxied_empty_host_is_a_usage_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "addressLists": [], "firewallRules": [] }
        })))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = tiklens_cmd();
    cmd.args(["--mode", "proxied", "--backend", &server.uri()])
        .args(["--on-failure", "error", "connect"])
        .args(["-H", " ", "-u", "admin", "--password", "x"]);
    let output = run_blocking(cmd).await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_writes_named_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "addressLists": [], "firewallRules": [] }
        })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = tiklens_cmd();
    cmd.args(["--mode", "proxied", "--backend", &server.uri()])
        .args(["export", "-H", "10.0.0.1", "-u", "admin", "--password", "x"])
        .args(["--name", "Edge", "--out-dir", dir.path().to_str().unwrap()]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let written = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    let file_name = Path::new(&written).file_name().unwrap().to_str().unwrap().to_owned();
    assert!(file_name.starts_with("firewall-config-Edge-"), "{file_name}");
    assert!(file_name.ends_with(".json"), "{file_name}");

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(doc["router"]["name"], "Edge");
    assert_eq!(doc["addressLists"], json!([]));
}
