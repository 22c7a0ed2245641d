mod common;

use std::path::Path;

use common::{fixture_path, spawn_command, spawn_command_with_env};

fn path_str(path: &Path) -> &str {
    path.to_str().expect("non-UTF-8 path")
}

/// Writes a single-device config pointing at `ip` into `dir`.
fn write_config(dir: &Path, ip: &str) -> std::path::PathBuf {
    let path = dir.join("roku.json");
    let config = serde_json::json!({
        "devices": {
            "default": "tv",
            "tv": { "ip": ip, "user": "rokudev", "password": "pw" }
        },
        "projects": {
            "default": "channel",
            "channel": {
                "app_name": "Channel",
                "directory": "/src/channel",
                "folders": ["source"],
                "files": ["manifest"]
            }
        }
    });
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

/// A local port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ============================================================================
// version / codes
// ============================================================================

#[test]
fn version_human() {
    let output = spawn_command(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("roku-deploy"), "unexpected output: {stdout}");
}

#[test]
fn version_json() {
    let output = spawn_command(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version JSON should be valid");
    assert_eq!(parsed["name"], "roku-deploy");
    assert!(parsed.get("version").is_some());
}

#[test]
fn codes_lists_full_catalog() {
    let output = spawn_command(&["codes"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 17);
    assert!(stdout.lines().next().unwrap().contains("Valid config."));
}

#[test]
fn codes_json() {
    let output = spawn_command(&["codes", "--format", "json"]);
    assert!(output.status.success());
    let parsed: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.len(), 17);
    assert_eq!(parsed[16]["code"], 16);
    assert_eq!(parsed[16]["message"], "A project stage is missing its branch.");
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_valid_files() {
    let json = fixture_path("valid.json");
    let yaml = fixture_path("valid.yaml");
    let output = spawn_command(&["validate", path_str(&json), path_str(&yaml)]);
    assert!(
        output.status.success(),
        "valid configs should pass: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("[0] Valid config.").count(), 2);
}

#[test]
fn validate_invalid_file_prints_every_code() {
    let config = fixture_path("invalid.json");
    let output = spawn_command(&["validate", path_str(&config)]);
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    for code in ["[1] ", "[5] ", "[10] ", "[13] "] {
        assert!(stdout.contains(code), "missing {code} in: {stdout}");
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is invalid (4 problem(s))"), "stderr: {stderr}");
}

#[test]
fn validate_json_reports_each_file() {
    let valid = fixture_path("valid.json");
    let invalid = fixture_path("invalid.json");
    let output = spawn_command(&[
        "validate",
        "--format",
        "json",
        path_str(&valid),
        path_str(&invalid),
    ]);
    assert_eq!(output.status.code(), Some(2));

    let parsed: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["valid"], true);
    assert_eq!(parsed[0]["codes"], serde_json::json!([0]));
    assert_eq!(parsed[1]["valid"], false);
    assert_eq!(parsed[1]["codes"], serde_json::json!([1, 5, 10, 13]));
}

#[test]
fn validate_empty_file_rejected() {
    let config = fixture_path("empty.yaml");
    let output = spawn_command(&["validate", path_str(&config)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty"), "stderr: {stderr}");
}

#[test]
fn validate_yaml_syntax_error_rejected() {
    let config = fixture_path("bad_yaml.yaml");
    let output = spawn_command(&["validate", path_str(&config)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse error"), "stderr: {stderr}");
}

#[test]
fn validate_missing_file() {
    let output = spawn_command(&["validate", "/nonexistent/roku.json"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file not found"), "stderr: {stderr}");
}

#[test]
fn validate_continues_past_unreadable_file() {
    let valid = fixture_path("valid.json");
    let output = spawn_command(&["validate", "/nonexistent/roku.json", path_str(&valid)]);
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/nonexistent/roku.json: file not found"), "stdout: {stdout}");
    assert!(stdout.contains("[0] Valid config."), "stdout: {stdout}");
}

#[test]
fn validate_json_includes_load_errors() {
    let valid = fixture_path("valid.json");
    let output = spawn_command(&[
        "validate",
        "--format",
        "json",
        path_str(&valid),
        "/nonexistent/roku.json",
    ]);
    assert_eq!(output.status.code(), Some(2));

    let parsed: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["valid"], true);
    assert_eq!(parsed[1]["valid"], false);
    assert!(parsed[1]["error"].as_str().unwrap().contains("file not found"));
}

#[test]
fn validate_json_keeps_dollar_signs_in_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "10.0.0.5");
    let text = std::fs::read_to_string(&path)
        .unwrap()
        .replace(r#""password":"pw""#, r#""password":"pa${ss$$""#);
    assert!(text.contains("pa${ss$$"));
    std::fs::write(&path, text).unwrap();

    let output = spawn_command(&["validate", path_str(&path)]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn validate_expands_environment_references() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roku.yaml");
    std::fs::write(
        &path,
        "devices:\n  default: tv\n  tv:\n    ip: ${ROKU_TEST_IP}\n    user: rokudev\n    password: ${ROKU_TEST_PASSWORD:-secret}\n\
         projects:\n  default: app\n  app: {app_name: A, directory: d, folders: [], files: []}\n",
    )
    .unwrap();

    let output = spawn_command_with_env(
        &["validate", path_str(&path)],
        &[("ROKU_TEST_IP", "10.1.1.1")],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// ============================================================================
// select
// ============================================================================

#[test]
fn select_build_mode_skips_probing() {
    let config = fixture_path("valid.json");
    let output = spawn_command(&["select", "--config", path_str(&config), "--mode", "build"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "192.168.1.20");
}

#[test]
fn select_reachable_device() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "127.0.0.1");

    let output = spawn_command_with_env(
        &["select", "--config", path_str(&config), "--format", "json"],
        &[("ROKU_DEPLOY_PROBE_PORT", port.as_str()), ("ROKU_DEPLOY_PROBE_TIMEOUT", "500ms")],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["mode"], "sideload");
    assert_eq!(parsed["device"]["ip"], "127.0.0.1");
    assert!(parsed["device"].get("password").is_none());
    drop(listener);
}

#[test]
fn select_requested_device_unreachable() {
    let port = closed_port().to_string();
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "127.0.0.1");

    let output = spawn_command_with_env(
        &["select", "--config", path_str(&config), "--device", "tv"],
        &[("ROKU_DEPLOY_PROBE_PORT", port.as_str()), ("ROKU_DEPLOY_PROBE_TIMEOUT", "200ms")],
    );
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("requested device 127.0.0.1 is unreachable"), "stderr: {stderr}");
}

#[test]
fn select_no_device_reachable() {
    let port = closed_port().to_string();
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "127.0.0.1");

    let output = spawn_command_with_env(
        &["select", "--config", path_str(&config)],
        &[("ROKU_DEPLOY_PROBE_PORT", port.as_str()), ("ROKU_DEPLOY_PROBE_TIMEOUT", "200ms")],
    );
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no configured device is reachable"), "stderr: {stderr}");
}

#[test]
fn select_rejects_invalid_config() {
    let config = fixture_path("invalid.json");
    let output = spawn_command(&["select", "--config", path_str(&config), "--mode", "build"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn select_unknown_device_suggests_match() {
    let config = fixture_path("valid.json");
    let output = spawn_command(&[
        "select",
        "--config",
        path_str(&config),
        "--device",
        "bedrom",
        "--mode",
        "build",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did you mean 'bedroom'?"), "stderr: {stderr}");
}

#[test]
fn select_reads_config_from_environment() {
    let config = fixture_path("valid.yaml");
    let output = spawn_command_with_env(
        &["select", "--mode", "validate"],
        &[("ROKU_DEPLOY_CONFIG", path_str(&config))],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "192.168.1.20");
}

#[test]
fn json_log_format_from_environment() {
    let config = fixture_path("valid.json");
    let output = spawn_command_with_env(
        &["-v", "validate", path_str(&config)],
        &[("ROKU_DEPLOY_LOG_FORMAT", "json")],
    );
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().next().expect("expected log output");
    let event: serde_json::Value = serde_json::from_str(first).expect("log line should be JSON");
    assert_eq!(event["level"], "INFO");
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = spawn_command(&["teleport"]);
    assert!(!output.status.success());
}
