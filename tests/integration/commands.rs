use super::common::{API, crex, target};
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_create_prefixes_root_path() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", format!("{API}/create.json").as_str())
        .match_header("authorization", "Basic YWRtaW46YWRtaW4=")
        .match_body(Matcher::Json(json!({ "rootPath": "/content/site", "name": "site" })))
        .with_status(200)
        .with_body(r#"{"packageId":"pkg1","name":"site"}"#)
        .expect(1)
        .create();

    crex(temp.path())
        .args(["--target", &target(&server), "create", "content/site", "--name", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package created named site (pkg1)"));

    mock.assert();
}

#[test]
fn test_create_failure_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", format!("{API}/create.json").as_str()).with_status(500).create();

    crex(temp.path())
        .args(["--target", &target(&server), "create", "/content/site", "-n", "site"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Request failed during create"))
        .stderr(predicate::str::contains("Request failed during create").not())
        .stderr(predicate::str::contains("error status"));
}

#[test]
fn test_target_from_environment() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", format!("{API}/status.json").as_str())
        .match_query(Matcher::UrlEncoded("packageId".into(), "pkg1".into()))
        .with_status(200)
        .with_body(r#"{"packageId":"pkg1","status":"installed"}"#)
        .expect(1)
        .create();

    crex(temp.path())
        .env("CREX_TARGET", target(&server))
        .args(["status", "pkg1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"installed\""));

    mock.assert();
}

#[test]
fn test_target_from_config_file() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", format!("{API}/packages.json").as_str())
        .with_status(200)
        .with_body(r#"[{"packageId":"pkg1","name":"site"}]"#)
        .expect(1)
        .create();

    std::fs::write(
        temp.path().join("config.toml"),
        format!("target = \"{}\"\n", target(&server)),
    )
    .unwrap();

    crex(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"packageId\": \"pkg1\""));

    mock.assert();
}

#[test]
fn test_download_writes_default_file() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", format!("{API}/download").as_str())
        .match_query(Matcher::UrlEncoded("packageId".into(), "pkg1".into()))
        .with_status(200)
        .with_body(b"PK\x03\x04zip-bytes".to_vec())
        .create();

    crex(temp.path())
        .args(["--target", &target(&server), "download", "pkg1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("downloaded to pkg1.zip"));

    assert_eq!(std::fs::read(temp.path().join("pkg1.zip")).unwrap(), b"PK\x03\x04zip-bytes");
}

#[test]
fn test_delete_unauthorized_suggests_credentials() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", format!("{API}/package.json").as_str())
        .match_query(Matcher::Any)
        .with_status(401)
        .expect(1)
        .create();

    crex(temp.path())
        .args(["--target", &format!("admin:wrong@{}", server.host_with_port()), "delete", "pkg1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Request failed during delete"))
        .stderr(predicate::str::contains("user and password"));

    mock.assert();
}

#[test]
fn test_install_prints_report() {
    let temp = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", format!("{API}/install.json").as_str())
        .match_body(Matcher::Json(json!({ "packageId": "pkg1", "synchronous": true })))
        .with_status(200)
        .with_body(r#"{"modifiedFiles":["jcr_root/index.html"]}"#)
        .create();

    crex(temp.path())
        .args(["--target", &target(&server), "install", "pkg1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package pkg1 installed on http://"))
        .stdout(predicate::str::contains("    modified:  jcr_root/index.html"))
        .stdout(predicate::str::contains("⦿  1 modified files"))
        .stdout(predicate::str::contains("●  0 added files"));
}
