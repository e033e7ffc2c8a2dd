use super::common::{API, crex, target};
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn site(root: &std::path::Path) {
    fs::create_dir_all(root.join("jcr_root/content/site")).unwrap();
    fs::create_dir_all(root.join("META-INF/vault")).unwrap();
    fs::write(root.join("jcr_root/content/site/index.html"), "<html/>").unwrap();
    fs::write(root.join("jcr_root/content/site/b.tmp"), "scratch").unwrap();
    fs::write(root.join("META-INF/vault/filter.xml"), "<workspaceFilter/>").unwrap();
}

#[test]
fn test_compress_upload_install_report() {
    let temp = TempDir::new().unwrap();
    site(temp.path());

    let mut server = mockito::Server::new();
    let upload = server
        .mock("POST", format!("{API}/upload.json").as_str())
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .with_status(200)
        .with_body(r#"{"packageId":"pkg1","name":"site"}"#)
        .expect(1)
        .create();
    let install = server
        .mock("POST", format!("{API}/install.json").as_str())
        .with_status(200)
        .with_body(
            r#"{"addedFiles":["a.html"],"removedFiles":[],"modifiedFiles":[],"ignoredFiles":["b.tmp"]}"#,
        )
        .expect(1)
        .create();

    let address = format!("http://{}", server.host_with_port());
    let output = crex(temp.path())
        .args([
            "--target",
            &target(&server),
            "upload",
            "--compress",
            "jcr_root,META-INF",
            "--omit",
            "**/*.tmp",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Package site uploaded on {address}")))
        .stdout(predicate::str::contains(format!("Package site installed on {address}")))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let order: Vec<usize> = ["0 removed files", "1 ignored files", "0 modified files", "1 added files"]
        .iter()
        .map(|needle| stdout.find(needle).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "categories out of order:\n{stdout}");
    assert!(stdout.contains("    ignored:  b.tmp"));
    assert!(stdout.contains("    added:  a.html"));

    // The temporary archive is removed after the run
    assert!(!temp.path().join("package.zip").exists());

    upload.assert();
    install.assert();
}

#[test]
fn test_upload_failure_skips_install_and_cleans_up() {
    let temp = TempDir::new().unwrap();
    site(temp.path());

    let mut server = mockito::Server::new();
    let upload = server
        .mock("POST", format!("{API}/upload.json").as_str())
        .with_status(500)
        .expect(1)
        .create();
    let install = server.mock("POST", format!("{API}/install.json").as_str()).expect(0).create();

    crex(temp.path())
        .args(["--target", &target(&server), "upload", "site.zip", "--compress", "jcr_root"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Upload failed"))
        .stdout(predicate::str::contains("installed on").not())
        .stderr(predicate::str::contains("Upload failed").not())
        .stderr(predicate::str::contains("answered with an error status"));

    assert!(!temp.path().join("site.zip").exists());
    upload.assert();
    install.assert();
}

#[test]
fn test_upload_existing_package_is_kept() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("site.zip"), b"PK-prebuilt").unwrap();

    let mut server = mockito::Server::new();
    let _upload = server
        .mock("POST", format!("{API}/upload.json").as_str())
        .match_body(Matcher::Regex("PK-prebuilt".to_string()))
        .with_status(200)
        .with_body(r#"{"packageId":"pkg1","name":"site"}"#)
        .create();
    let _install = server
        .mock("POST", format!("{API}/install.json").as_str())
        .with_status(200)
        .with_body("{}")
        .create();

    crex(temp.path())
        .args(["--target", &target(&server), "upload", "site.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 added files"));

    assert!(temp.path().join("site.zip").exists());
}

#[test]
fn test_missing_port_fails_without_request() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("site.zip"), b"PK").unwrap();

    crex(temp.path())
        .args(["--target", "admin:admin@localhost", "upload", "site.zip"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Upload failed"));
}
