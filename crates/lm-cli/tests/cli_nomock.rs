//! End-to-end tests for the logmask binary.
//!
//! These run the real binary against real config files and verify payloads
//! on stdout and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value as JsonValue};
use std::fs;
use tempfile::tempdir;

/// Get a Command for the logmask binary with a clean environment.
fn logmask() -> Command {
    let mut cmd = Command::cargo_bin("logmask").expect("logmask binary should exist");
    cmd.env_remove("LOGMASK_CONFIG")
        .env_remove("LOGMASK_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> JsonValue {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============================================================================
// sanitize
// ============================================================================

mod sanitize {
    use super::*;

    #[test]
    fn masks_json_from_stdin() {
        let output = logmask()
            .arg("sanitize")
            .write_stdin(r#"{"password": "secret123", "user": "alice"}"#)
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(
            stdout_json(&output),
            json!({"password": "[MASKED]", "user": "alice"})
        );
    }

    #[test]
    fn masks_plain_text() {
        logmask()
            .arg("sanitize")
            .write_stdin("User CPF: 123.456.789-09\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("User CPF: [MASKED]"))
            .stdout(predicate::str::contains("123.456.789-09").not());
    }

    #[test]
    fn custom_token() {
        let output = logmask()
            .args(["sanitize", "--token", "hidden", "--compact"])
            .write_stdin(r#"{"token": "abc"}"#)
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r#"{"token":"[HIDDEN]"}"#);
    }

    #[test]
    fn line_mode_sanitizes_each_line() {
        let output = logmask()
            .args(["sanitize", "--lines"])
            .write_stdin("{\"api_key\": \"k\"}\n\nhunter2 was the password\n")
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines, vec![r#"{"api_key":"[MASKED]"}"#, r#""[MASKED] was the password""#]);
    }

    #[test]
    fn reads_input_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("event.json");
        fs::write(&path, r#"{"contact": "alice@example.com"}"#).unwrap();

        let output = logmask()
            .args(["sanitize", "--input"])
            .arg(&path)
            .output()
            .unwrap();
        assert_eq!(stdout_json(&output), json!({"contact": "[MASKED]"}));
    }

    #[test]
    fn missing_input_file_is_io_error() {
        logmask()
            .args(["sanitize", "--input", "/nonexistent/logmask/input.json"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("failed to read input"));
    }
}

// ============================================================================
// check / keys / patterns
// ============================================================================

mod checks {
    use super::*;

    #[test]
    fn check_sensitive_value_exits_one() {
        logmask()
            .args(["check", "alice@example.com"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#"{"sensitive":true}"#));
    }

    #[test]
    fn check_plain_value_exits_zero() {
        logmask()
            .args(["check", "hello"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains(r#"{"sensitive":false}"#));
    }

    #[test]
    fn keys_lists_variants() {
        let output = logmask().arg("keys").output().unwrap();
        let keys = stdout_json(&output);
        let keys = keys.as_array().expect("array of keys");
        assert!(keys.contains(&json!("password")));
        assert!(keys.contains(&json!("apikey")));
    }

    #[test]
    fn patterns_include_custom_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"sensitive_patterns": ["\\bORD-\\d{6}\\b"]}"#).unwrap();

        let output = logmask()
            .arg("patterns")
            .env("LOGMASK_CONFIG", &path)
            .output()
            .unwrap();
        let patterns = stdout_json(&output);
        assert_eq!(
            patterns.as_array().and_then(|p| p.last()),
            Some(&json!(r"\bORD-\d{6}\b"))
        );
    }
}

// ============================================================================
// validate / configuration errors
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn validate_defaults() {
        let output = logmask().arg("validate").output().unwrap();
        assert!(output.status.success());
        let report = stdout_json(&output);
        assert_eq!(report["status"], "ok");
        assert_eq!(report["default_mask_token"], "[MASKED]");
        assert_eq!(report["max_depth"], 10);
    }

    #[test]
    fn validate_reports_invalid_pattern() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"sensitive_patterns": ["(unclosed"]}"#).unwrap();

        let output = logmask()
            .arg("validate")
            .arg("--config")
            .arg(&path)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(11));
        let report = stdout_json(&output);
        assert_eq!(report["status"], "invalid");
        assert_eq!(report["error"]["kind"], "sensitive_patterns");
    }

    #[test]
    fn validate_reports_spaced_mask_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_mask_token": "hidden value"}"#).unwrap();

        let output = logmask()
            .arg("validate")
            .arg("--config")
            .arg(&path)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(11));
        let report = stdout_json(&output);
        assert_eq!(report["status"], "invalid");
        assert_eq!(report["error"]["kind"], "mask_token");

        logmask()
            .arg("check")
            .arg("--config")
            .arg(&path)
            .arg("hunter2")
            .assert()
            .code(11)
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn invalid_config_blocks_sanitize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"separators": ["is now"]}"#).unwrap();

        logmask()
            .arg("sanitize")
            .arg("--config")
            .arg(&path)
            .write_stdin("{}")
            .assert()
            .code(11)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("separator"));
    }

    #[test]
    fn malformed_config_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        logmask()
            .arg("keys")
            .arg("--config")
            .arg(&path)
            .assert()
            .code(11);
    }

    #[test]
    fn unknown_command_is_args_error() {
        logmask()
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn help_exits_zero() {
        logmask()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("sanitize"));
    }
}
