//! Integration tests for the `wikijs` CLI binary.
//!
//! Argument parsing, configuration errors and exit codes run without a
//! server; the end-to-end cases drive the binary against a wiremock Wiki.js.
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Match, Mock, MockBuilder, MockServer, Request, Respond, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wikijs` binary with env isolation.
///
/// Clears all `WIKIJS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn wikijs_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wikijs");
    cmd.env("HOME", "/tmp/wikijs-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wikijs-cli-test-nonexistent")
        .env("WIKIJS_RETRY_ATTEMPTS", "1")
        .env_remove("WIKIJS_CONFIG")
        .env_remove("WIKIJS_HOST")
        .env_remove("WIKIJS_USERNAME")
        .env_remove("WIKIJS_PASSWORD")
        .env_remove("WIKIJS_INITIAL_SETUP")
        .env_remove("WIKIJS_CLIENT_TIMEOUT")
        .env_remove("WIKIJS_CA_CERT")
        .env_remove("WIKIJS_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wikijs_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wikijs_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Wiki.js")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("strategies"))
            .and(predicate::str::contains("active-strategies"))
            .and(predicate::str::contains("strategy")),
    );
}

#[test]
fn test_version_flag() {
    wikijs_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wikijs"));
}

#[test]
fn test_completions_zsh() {
    wikijs_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    wikijs_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_subcommand() {
    let output = wikijs_cmd().arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected error naming the subcommand:\n{text}");
}

#[test]
fn test_invalid_output_format() {
    let output = wikijs_cmd()
        .args(["--output", "xml", "strategies"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_strategies_without_host() {
    wikijs_cmd()
        .arg("strategies")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No Wiki.js host configured"));
}

#[test]
fn test_strategies_without_password_is_auth_error() {
    wikijs_cmd()
        .args(["--host", "http://127.0.0.1:9", "--username", "admin@example.com"])
        .arg("strategies")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No password configured"));
}

#[test]
fn test_invalid_host_is_usage_error() {
    wikijs_cmd()
        .args(["--host", "ftp://wiki.example.com", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("host"));
}

#[test]
fn test_config_masks_password() {
    wikijs_cmd()
        .args(["--host", "http://wiki.local:3000", "--password", "s3cr3t-value", "config"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("host = \"http://wiki.local:3000\"")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("s3cr3t-value").not()),
        );
}

#[test]
fn test_config_file_wins_over_environment() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "host = \"https://from-file.example.com\"\n").unwrap();

    wikijs_cmd()
        .env("WIKIJS_HOST", "http://from-env:3000")
        .env("WIKIJS_USERNAME", "env-admin@example.com")
        .arg("--config")
        .arg(&file)
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("from-file.example.com")
                .and(predicate::str::contains("env-admin@example.com"))
                .and(predicate::str::contains("from-env").not()),
        );
}

#[test]
fn test_flags_win_over_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "host = \"https://from-file.example.com\"\nclient_timeout = 10\n").unwrap();

    wikijs_cmd()
        .arg("--config")
        .arg(&file)
        .args(["--host", "http://from-flag:3000", "--timeout", "5", "config"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("from-flag")
                .and(predicate::str::contains("client_timeout = 5")),
        );
}

// ── Against a mock Wiki.js ──────────────────────────────────────────

/// Matches a GraphQL request whose query selects `field`.
struct GraphQlField(&'static str);

impl Match for GraphQlField {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|v| v.get("query").and_then(Value::as_str).map(String::from))
            .is_some_and(|q| {
                q.split(|c: char| !c.is_ascii_alphanumeric())
                    .any(|word| word == self.0)
            })
    }
}

fn graphql(field: &'static str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(GraphQlField(field))
}

/// Remembers the name of the key the CLI issued so it can be listed back.
#[derive(Clone, Default)]
struct IssuedKey(Arc<Mutex<Option<String>>>);

struct RecordIssuedKey(IssuedKey);

impl Respond for RecordIssuedKey {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let name = body["variables"]["name"].as_str().unwrap().to_owned();
        *self.0.0.lock().unwrap() = Some(name);

        ResponseTemplate::new(200).set_body_json(json!({
            "data": { "authentication": { "createApiKey": {
                "key": "cli-key",
                "responseResult": { "succeeded": true, "errorCode": 0, "slug": "ok", "message": "ok" }
            } } }
        }))
    }
}

struct ListIssuedKey(IssuedKey);

impl Respond for ListIssuedKey {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let name = self.0.0.lock().unwrap().clone().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!({
            "data": { "authentication": { "apiKeys": [{
                "id": 21,
                "name": name,
                "keyShort": "...-key",
                "expiration": "2026-10-19T00:00:00.000Z",
                "isRevoked": false,
                "createdAt": "2025-10-19T00:00:00.000Z",
                "updatedAt": "2025-10-19T00:00:00.000Z"
            }] } }
        }))
    }
}

fn ok_result(field: &str) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert(
        field.to_owned(),
        json!({ "responseResult": { "succeeded": true, "errorCode": 0, "slug": "ok", "message": "ok" } }),
    );
    json!({ "data": { "authentication": payload } })
}

/// A set-up instance that accepts the admin login and issues one key.
async fn mock_wiki() -> MockServer {
    let server = MockServer::start().await;
    let issued = IssuedKey::default();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Wiki.js</html>"))
        .mount(&server)
        .await;
    graphql("login")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "authentication": { "login": {
                "responseResult": { "succeeded": true, "errorCode": 0, "slug": "ok", "message": "Login success" },
                "jwt": "cli-jwt"
            } } }
        })))
        .mount(&server)
        .await;
    graphql("apiState")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "authentication": { "apiState": true } } })),
        )
        .mount(&server)
        .await;
    graphql("createApiKey")
        .respond_with(RecordIssuedKey(issued.clone()))
        .expect(1)
        .mount(&server)
        .await;
    graphql("apiKeys")
        .and(header("authorization", "Bearer cli-key"))
        .respond_with(ListIssuedKey(issued))
        .mount(&server)
        .await;
    graphql("revokeApiKey")
        .and(body_partial_json(json!({ "variables": { "id": 21 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_result("revokeApiKey")))
        .expect(1)
        .mount(&server)
        .await;
    graphql("strategies")
        .and(header("authorization", "Bearer cli-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "authentication": { "strategies": [
                { "key": "local", "props": [], "title": "Local", "isAvailable": true, "useForm": true, "usernameType": "email" },
                { "key": "github", "props": [{ "key": "clientId", "value": "{}" }], "title": "GitHub", "isAvailable": true, "useForm": false }
            ] } }
        })))
        .mount(&server)
        .await;

    server
}

fn authenticated_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = wikijs_cmd();
    cmd.env("WIKIJS_HOST", server.uri())
        .env("WIKIJS_USERNAME", "admin@example.com")
        .env("WIKIJS_PASSWORD", "hunter-two-hunter");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_strategies_json_and_key_is_revoked() {
    let server = mock_wiki().await;
    let mut cmd = authenticated_cmd(&server);
    cmd.args(["--output", "json", "strategies"]);

    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let keys: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["local", "github"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_strategy_plain_output() {
    let server = mock_wiki().await;
    let mut cmd = authenticated_cmd(&server);
    cmd.args(["-o", "plain", "strategy", "github"]);

    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "github");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_strategy_exits_not_found_and_still_revokes() {
    let server = mock_wiki().await;
    let mut cmd = authenticated_cmd(&server);
    cmd.args(["strategy", "saml"]);

    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("'saml' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_reports_setup_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><setup></setup></html>"),
        )
        .mount(&server)
        .await;

    let mut cmd = wikijs_cmd();
    let host = server.uri();
    cmd.args(["--host", host.as_str(), "-o", "plain", "status"]);

    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "setup-pending");
}

#[test]
fn test_status_unreachable_host_exits_with_connection_code() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let host = format!("http://127.0.0.1:{port}");
    wikijs_cmd()
        .args(["--host", host.as_str(), "status"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}
