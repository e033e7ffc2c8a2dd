//! One-shot package creation behind `crex create`.

use crate::client::{CrexClient, NewPackageArgs, PackageRef};
use crate::core::Result;
use crate::reporter::Reporter;

/// Prefix `path` with `/` unless it already starts with one.
#[must_use]
pub fn normalize_root_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Create a package named `name` rooted at `path` and report the result.
///
/// # Errors
///
/// Returns the client error after reporting it; nothing is retried.
pub async fn create_package<R: Reporter>(
    client: &CrexClient,
    path: &str,
    name: &str,
    reporter: R,
) -> Result<PackageRef> {
    let args = NewPackageArgs {
        root_path: normalize_root_path(path),
        name: name.to_string(),
    };
    reporter.start(&format!("Creating package {name}"));

    let result = client.create_package(&args).await;
    match &result {
        Ok(package) => reporter.succeed(&format!(
            "Package created named {} ({})",
            package.name, package.package_id
        )),
        Err(e) => reporter.fail(&e.to_string()),
    }
    reporter.stop();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use crate::test_utils::{RecordingReporter, init_test_logging};
    use mockito::Matcher;
    use serde_json::json;
    use serial_test::serial;

    const CREATE: &str = "/apps/creative-exchange/api/create.json";

    #[test]
    fn test_normalize_root_path() {
        assert_eq!(normalize_root_path("content/site"), "/content/site");
        assert_eq!(normalize_root_path("/content/site"), "/content/site");
        assert_eq!(normalize_root_path(""), "/");
    }

    #[tokio::test]
    #[serial]
    async fn test_create_reports_name_and_id() {
        init_test_logging(None);
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", CREATE)
            .match_body(Matcher::Json(json!({ "rootPath": "/content/site", "name": "site" })))
            .with_status(200)
            .with_body(r#"{"packageId":"pkg1","name":"site"}"#)
            .expect(1)
            .create_async()
            .await;

        let address = format!("admin:admin@{}", server.host_with_port());
        let client = CrexClient::new(ClientOptions::from_address(&address).with_proxy(None)).unwrap();
        let reporter = RecordingReporter::new();

        let package = create_package(&client, "content/site", "site", &reporter).await.unwrap();

        assert_eq!(package.package_id, "pkg1");
        assert_eq!(reporter.successes(), vec!["Package created named site (pkg1)"]);
        assert!(reporter.failures().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_create_failure_is_reported_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", CREATE).with_status(500).expect(1).create_async().await;

        let address = format!("admin:admin@{}", server.host_with_port());
        let client = CrexClient::new(ClientOptions::from_address(&address).with_proxy(None)).unwrap();
        let reporter = RecordingReporter::new();

        let err = create_package(&client, "/content/site", "site", &reporter).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(reporter.failures().len(), 1);
        assert!(reporter.failures()[0].contains("create"));
        assert!(reporter.successes().is_empty());
        mock.assert_async().await;
    }
}
