//! Integration tests for the zenith binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A zenith command isolated to `temp`: its own config file, install
/// directory and home.
fn zenith(temp: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("zenith"));
    cmd.env("HOME", temp)
        .env("ZENITH_INSTALL_DIR", temp.join("tools"))
        .env_remove("ZENITH_SSH_CLONE")
        .arg("--config")
        .arg(temp.join("config.yml"));
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("zenith"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("security tools"))
        .stdout(predicate::str::contains("reset-deps"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("zenith"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_list_shows_catalogue() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Information Gathering"))
        .stdout(predicate::str::contains("sherlock"))
        .stdout(predicate::str::contains("bettercap"))
        .stdout(predicate::str::contains("reset_dependencies"));
    Ok(())
}

#[test]
fn cli_list_filters_by_category() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .args(["list", "--category", "passwords"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cupp"))
        .stdout(predicate::str::contains("sherlock").not());
    Ok(())
}

#[test]
fn cli_list_unknown_category_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .args(["list", "--category", "web_apps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
    Ok(())
}

#[test]
fn cli_menu_needs_terminal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interactive terminal"));
    Ok(())
}

#[test]
fn cli_run_unknown_tool_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .args(["run", "nmap"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown tool: nmap"));
    Ok(())
}

#[test]
fn cli_run_utility_with_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .args(["run", "base64_decode", "aGVsbG8="])
        .assert()
        .success()
        .stdout(predicate::str::contains("Decoded: hello"));
    Ok(())
}

#[test]
fn cli_run_missing_tool_declines_without_answer() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path())
        .args(["run", "cupp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cupp is not installed"))
        .stdout(predicate::str::contains("Installation cancelled"));
    assert!(!temp.path().join("tools").join("cupp").exists());
    Ok(())
}

#[test]
fn cli_reset_deps_uses_prompt_override() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tool_dir = temp.path().join("tools").join("s3scanner");
    fs::create_dir_all(&tool_dir)?;
    fs::write(tool_dir.join(".zenith_deps_installed"), "x")?;

    zenith(temp.path())
        .env("ZENITH_PROMPT_RESET_DEPENDENCIES", "y")
        .arg("reset-deps")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 dependency markers:"))
        .stdout(predicate::str::contains("Reset dependencies for s3scanner"));

    assert!(!tool_dir.join(".zenith_deps_installed").exists());
    Ok(())
}

#[test]
fn cli_info_prints_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("config.yml"), "agreement: true\n")?;

    zenith(temp.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Config File"))
        .stdout(predicate::str::contains("agreement: true"))
        .stdout(predicate::str::contains("# Package Manager"));
    Ok(())
}

#[test]
fn cli_invalid_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("config.yml"), "agreement: [")?;

    zenith(temp.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("zenith"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("zenith"));
    Ok(())
}

#[test]
fn cli_invalid_command_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("zenith"));
    cmd.arg("invalid-command");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_debug_flag_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    zenith(temp.path()).args(["--debug", "list"]).assert().success();
    Ok(())
}
