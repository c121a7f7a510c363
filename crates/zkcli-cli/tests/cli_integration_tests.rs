//! CLI integration tests
//!
//! Drive the built `zkcli` binary against a temporary SQLite store.

mod common;

use std::process::Command;

use common::{stderr, CliHarness};

#[test]
fn test_creater_then_lsr() {
    let cli = CliHarness::new();

    cli.ok(&["creater", "/app/config/db", "postgres"]);
    cli.ok(&["create", "/app/logs", ""]);

    assert_eq!(cli.ok(&["lsr", "/app"]), "config\nconfig/db\nlogs\n");
    assert_eq!(cli.ok(&["ls", "/app"]), "config\nlogs\n");
    assert_eq!(cli.ok(&["get", "/app/config/db"]), "postgres\n");
}

#[test]
fn test_json_format() {
    let cli = CliHarness::new();
    cli.ok(&["creater", "/a/b", "x"]);

    assert_eq!(cli.ok(&["--format", "json", "lsr", "/a"]), "[\"b\"]\n");
    assert_eq!(cli.ok(&["--format", "json", "get", "/a/b"]), "\"x\"\n");
    assert_eq!(cli.ok(&["--format", "json", "exists", "/a"]), "true\n");
}

#[test]
fn test_exists_exit_status() {
    let cli = CliHarness::new();
    cli.ok(&["create", "/present", ""]);

    assert_eq!(cli.ok(&["exists", "/present"]), "true\n");

    let output = cli.run(&["exists", "/absent"]);
    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "false\n");
}

#[test]
fn test_create_without_force_needs_parent() {
    let cli = CliHarness::new();

    let output = cli.run(&["create", "/a/b", "x"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_NOT_FOUND"));

    let output = cli.run(&["exists", "/a"]);
    assert!(!output.status.success());
}

#[test]
fn test_trailing_slash_rejected() {
    let cli = CliHarness::new();

    let output = cli.run(&["ls", "/a/"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("must not end with '/'"));
}

#[test]
fn test_set_from_file_and_inline() {
    let cli = CliHarness::new();
    cli.ok(&["create", "/n", "v0"]);

    let file = cli.write_file("payload.txt", b"from file");
    cli.ok(&["set", "/n", "-f", file.to_str().unwrap()]);
    assert_eq!(cli.ok(&["get", "/n"]), "from file\n");

    cli.ok(&["set", "/n", "inline"]);
    assert_eq!(cli.ok(&["get", "/n"]), "inline\n");
}

#[test]
fn test_set_with_stale_version_fails() {
    let cli = CliHarness::new();
    cli.ok(&["create", "/n", "v0"]);
    cli.ok(&["set", "/n", "v1", "--version", "0"]);

    let output = cli.run(&["set", "/n", "v2", "--version", "0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_VERSION_CONFLICT"));
    assert_eq!(cli.ok(&["get", "/n"]), "v1\n");
}

#[test]
fn test_delete() {
    let cli = CliHarness::new();
    cli.ok(&["creater", "/a/b", ""]);

    let output = cli.run(&["delete", "/a"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_NOT_EMPTY"));

    cli.ok(&["delete", "/a/b"]);
    cli.ok(&["delete", "/a"]);
    assert_eq!(cli.ok(&["ls", "/"]), "");
}

#[test]
fn test_missing_data_argument() {
    let cli = CliHarness::new();

    let output = cli.run(&["create", "/a"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Expected data argument"));
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let cli = CliHarness::new();

    let output = cli.run(&["--verbose", "create", "/a", "x"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("Created /a"));
}

#[test]
fn test_config_file_supplies_backend_and_format() {
    let cli = CliHarness::new();
    cli.ok(&["creater", "/cfg/x", "1"]);

    let config = cli.write_file(
        "zkcli.toml",
        format!(
            "format = \"json\"\n\n[backend]\nkind = \"sqlite\"\npath = {:?}\n",
            cli.db.to_str().unwrap()
        )
        .as_bytes(),
    );

    let output = Command::new(env!("CARGO_BIN_EXE_zkcli"))
        .current_dir(cli.path())
        .args(["--config", config.to_str().unwrap(), "ls", "/cfg"])
        .output()
        .expect("Failed to execute CLI");
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "[\"x\"]\n");
}

#[test]
fn test_backend_required() {
    let output = Command::new(env!("CARGO_BIN_EXE_zkcli"))
        .args(["get", "/a"])
        .output()
        .expect("Failed to execute CLI");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_INVALID_INPUT"));
}

#[test]
fn test_failed_command_reports_error_once() {
    let cli = CliHarness::new();

    let output = cli.run(&["get", "/missing"]);
    assert!(!output.status.success());

    let stderr = stderr(&output);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "stderr was: {}", stderr);
    assert!(lines[0].starts_with("Error: [ERR_NOT_FOUND] in operation 'get'"));
}

#[test]
fn test_stack_flag_appends_trace() {
    let cli = CliHarness::new();

    let output = cli.run(&["--stack", "get", "/missing"]);
    assert!(!output.status.success());

    let stderr = stderr(&output);
    assert!(stderr.starts_with("Error: [ERR_NOT_FOUND]"));
    assert!(stderr.lines().count() > 1, "stderr was: {}", stderr);
}

#[test]
fn test_redirected_logs_have_no_ansi_escapes() {
    let cli = CliHarness::new();

    let output = cli.run(&["--debug", "create", "/plain", "x"]);
    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Created /plain"));
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn test_json_log_format() {
    let cli = CliHarness::new();

    let output = cli.run(&["--verbose", "--log-format", "json", "create", "/j", "x"]);
    assert!(output.status.success(), "Stderr: {}", stderr(&output));

    let stderr = stderr(&output);
    let events: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(events
        .iter()
        .any(|e| e["fields"]["message"] == "Created /j"));
}
