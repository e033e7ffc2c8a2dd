use super::common::crex;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    crex(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("--target"));
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    crex(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_create_without_name_is_usage_error() {
    let temp = TempDir::new().unwrap();
    crex(temp.path())
        .args(["create", "content/site"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "omit = [").unwrap();

    crex(temp.path())
        .args(["status", "pkg1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_unreachable_target_suggests_checking_instance() {
    let temp = TempDir::new().unwrap();
    crex(temp.path())
        .args(["--target", "admin:admin@127.0.0.1:1", "status", "pkg1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Request failed during status"))
        .stderr(predicate::str::contains("suggestion"));
}
