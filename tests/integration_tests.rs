//! Integration tests for the prompt-registry CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a prompt-registry command pointed at `dir`
fn pr(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prompt-registry").unwrap();
    cmd.arg("--prompts-dir").arg(dir).env_remove("PROMPT_REGISTRY_DIR");
    cmd
}

/// Helper to create an initialized prompts directory
fn setup_prompts() -> TempDir {
    let tmp = TempDir::new().unwrap();
    pr(tmp.path()).arg("init").assert().success();
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    Command::cargo_bin("prompt-registry")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt templates"));
}

#[test]
fn test_unknown_command_fails() {
    Command::cargo_bin("prompt-registry")
        .unwrap()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init / List / Show
// ============================================================================

#[test]
fn test_init_creates_example() {
    let tmp = TempDir::new().unwrap();
    let prompts = tmp.path().join("prompts");

    pr(&prompts)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(prompts.join("example.yaml").is_file());
}

#[test]
fn test_init_keeps_existing_example() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("example.yaml"), "template: custom\n").unwrap();

    pr(tmp.path()).arg("init").assert().success();

    let content = fs::read_to_string(tmp.path().join("example.yaml")).unwrap();
    assert_eq!(content, "template: custom\n");
}

#[test]
fn test_list_empty_directory() {
    let tmp = TempDir::new().unwrap();
    pr(&tmp.path().join("missing"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No prompts found"));
}

#[test]
fn test_list_shows_versions() {
    let tmp = setup_prompts();
    fs::write(
        tmp.path().join("example_v3.yaml"),
        "name: example\nversion: 3\ntemplate: three\n",
    )
    .unwrap();

    pr(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example"))
        .stdout(predicate::str::contains("v1, v3"));
}

#[test]
fn test_list_json() {
    let tmp = setup_prompts();

    let output = pr(tmp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["name"], "example");
    assert_eq!(parsed[0]["versions"], serde_json::json!([1]));
}

#[test]
fn test_show_example() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .args(["show", "example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("topic"))
        .stdout(predicate::str::contains("general audience"));
}

#[test]
fn test_show_missing_template_fails() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_with_default() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .args(["render", "example", "--var", "topic=gravity"])
        .assert()
        .success()
        .stdout("Explain gravity in simple terms for a general audience.\n");
}

#[test]
fn test_render_missing_required_fails() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .args(["render", "example"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("topic"));
}

#[test]
fn test_render_unknown_variable_fails() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .args(["render", "example", "-V", "topic=x", "-V", "colour=red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_render_specific_version() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.yaml"), "template: \"Hi {{ x }}\"\nvariables:\n  x: {}\n").unwrap();
    fs::write(
        tmp.path().join("a_v2.yaml"),
        "name: a\nversion: 2\ntemplate: \"Bye {{ x }}\"\nvariables:\n  x: {}\n",
    )
    .unwrap();

    pr(tmp.path())
        .args(["render", "a", "--var", "x=yo"])
        .assert()
        .success()
        .stdout("Bye yo\n");

    pr(tmp.path())
        .args(["render", "a", "--version", "1", "--var", "x=yo"])
        .assert()
        .success()
        .stdout("Hi yo\n");

    pr(tmp.path())
        .args(["render", "a", "-v", "1", "-V", "x=yo"])
        .assert()
        .success()
        .stdout("Hi yo\n");
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_success() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("validated successfully"));
}

#[test]
fn test_validate_reports_errors() {
    let tmp = setup_prompts();
    fs::write(
        tmp.path().join("bad.yaml"),
        "version: 0\ntemplate: \"{{ undeclared }}\"\n",
    )
    .unwrap();

    pr(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("bad:v0"))
        .stdout(predicate::str::contains("undeclared"));
}

#[test]
fn test_validate_reports_non_integer_version() {
    let tmp = setup_prompts();
    fs::write(tmp.path().join("draft.yaml"), "version: \"2\"\ntemplate: draft\n").unwrap();

    pr(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example"));

    pr(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("draft:v2"))
        .stdout(predicate::str::contains("Version must be a positive integer"));
}

#[test]
fn test_malformed_file_fails_load() {
    let tmp = setup_prompts();
    fs::write(tmp.path().join("broken.yaml"), "name: [oops\n").unwrap();

    pr(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.yaml"));
}

// ============================================================================
// New
// ============================================================================

#[test]
fn test_new_creates_template() {
    let tmp = TempDir::new().unwrap();

    pr(tmp.path())
        .args([
            "new",
            "summary",
            "--description",
            "Summarize text",
            "--var",
            "text!:Text to summarize",
            "--var",
            "tone?",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary.yaml"));

    pr(tmp.path()).arg("validate").assert().success();

    pr(tmp.path())
        .args(["render", "summary", "--var", "text=hello", "--var", "tone=dry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn test_new_refuses_existing_name() {
    let tmp = setup_prompts();

    pr(tmp.path())
        .args(["new", "example"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    Command::cargo_bin("prompt-registry")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt-registry"));
}
