//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clistarter"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("A starter command-line tool"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("plugin"));
}

#[test]
fn test_missing_config_error() {
    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg("nonexistent.json")
        .arg("list")
        .assert()
        .failure()
        .code(2) // I/O error
        .stdout(predicate::str::contains("Failed to load configuration file"));
}

#[test]
fn test_unsupported_extension_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "settings.ini", "name=a\n");

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .failure()
        .code(3) // Format error
        .stdout(predicate::str::contains("unsupported file extension"));
}

#[test]
fn test_list_plain_sorted_and_filtered() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        "settings.yaml",
        "zeta: 1\nserver_host: example.com\nServer_port: 80\nname: demo\n",
    );

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--search")
        .arg("server")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Server_port = 80\nserver_host = \"example.com\"",
        ))
        .stdout(predicate::str::contains("zeta").not());
}

#[test]
fn test_list_json_pagination() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "settings.json", r#"{"c":3,"a":1,"b":2}"#);

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("list")
        .arg("-o")
        .arg("json")
        .arg("--page")
        .arg("2")
        .arg("--limit")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"c\": 3"))
        .stdout(predicate::str::contains("\"a\"").not());
}

#[test]
fn test_list_rejects_zero_limit() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "settings.json", "{}");

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--limit")
        .arg("0")
        .assert()
        .failure()
        .code(1); // Configuration error
}

#[test]
fn test_set_merges_into_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        "settings.toml",
        "title = \"demo\"\n\n[server]\nhost = \"localhost\"\nport = 80\n",
    );

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("set")
        .arg("server.port=8080")
        .arg("owner=ops")
        .assert()
        .success();

    let written: toml::Value = toml::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(written["title"].as_str(), Some("demo"));
    assert_eq!(written["owner"].as_str(), Some("ops"));
    assert_eq!(written["server"]["host"].as_str(), Some("localhost"));
    assert_eq!(written["server"]["port"].as_integer(), Some(8080));
}

#[test]
fn test_set_type_conflict_is_merge_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "settings.json", r#"{"server":{"port":80}}"#);

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .arg("set")
        .arg("server=down")
        .assert()
        .failure()
        .code(4); // Merge error

    assert_eq!(
        fs::read_to_string(&config).unwrap(),
        r#"{"server":{"port":80}}"#
    );
}

#[test]
fn test_plugin_command_preserves_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "settings.json", r#"{"plugins":{"x":{"v":1}}}"#);

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("plugin")
        .arg("y")
        .arg(r#"{"v":2}"#)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&config).unwrap(),
        r#"{"plugins":{"x":{"v":1},"y":{"v":2}}}"#
    );
}

#[test]
fn test_plugin_command_rejects_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "settings.yaml", "plugins: {}\n");

    let mut cmd = Command::cargo_bin("clistarter").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .arg("plugin")
        .arg("y")
        .arg("{}")
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("only supported for JSON"));
}
