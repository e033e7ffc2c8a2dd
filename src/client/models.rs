//! Request and response types of the Creative Exchange API.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Identity of a remote package, returned by create and upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRef {
    /// Remote package identifier
    pub package_id: String,
    /// Human-readable package name
    pub name: String,
}

/// File-level diff produced by a synchronous install.
///
/// Each list keeps the order returned by the remote system. Categories missing
/// from the response decode as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeSet {
    /// Files added by the install
    pub added_files: Vec<String>,
    /// Files removed by the install
    pub removed_files: Vec<String>,
    /// Files whose content changed
    pub modified_files: Vec<String>,
    /// Files the remote system skipped
    pub ignored_files: Vec<String>,
}

impl ChangeSet {
    /// Total number of paths across all four categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.added_files.len()
            + self.removed_files.len()
            + self.modified_files.len()
            + self.ignored_files.len()
    }
}

/// Arguments addressing a single package (status, build, download, delete).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageArgs {
    /// Remote package identifier
    pub package_id: String,
}

impl PackageArgs {
    /// Address the package with the given identifier.
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
        }
    }
}

/// Optional filters for the package list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageListArgs {
    /// Only list packages whose name contains this string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Arguments for creating a package from a repository path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackageArgs {
    /// Repository path to package, always starting with `/`
    pub root_path: String,
    /// Name of the new package
    pub name: String,
}

/// Arguments for installing an uploaded package.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPackageArgs {
    /// Remote package identifier
    pub package_id: String,
    /// Block until the install finishes and return its [`ChangeSet`]
    pub synchronous: bool,
}

/// A package file handed to the upload endpoint.
///
/// The file handle is consumed by the request and closed when it completes.
#[derive(Debug)]
pub struct UploadPackageArgs {
    /// Open handle to the package file
    pub file: tokio::fs::File,
    /// File name sent in the multipart part
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_set_decodes_camel_case() {
        let changes: ChangeSet = serde_json::from_value(json!({
            "addedFiles": ["a.html"],
            "removedFiles": [],
            "modifiedFiles": ["c.css"],
            "ignoredFiles": ["b.tmp"]
        }))
        .unwrap();

        assert_eq!(changes.added_files, vec!["a.html"]);
        assert_eq!(changes.modified_files, vec!["c.css"]);
        assert_eq!(changes.ignored_files, vec!["b.tmp"]);
        assert_eq!(changes.total(), 3);
    }

    #[test]
    fn test_change_set_missing_categories_default_to_empty() {
        let changes: ChangeSet = serde_json::from_value(json!({ "addedFiles": ["x"] })).unwrap();
        assert!(changes.removed_files.is_empty());
        assert!(changes.ignored_files.is_empty());
        assert_eq!(changes.total(), 1);
    }

    #[test]
    fn test_package_ref_decodes_extra_fields() {
        let package: PackageRef = serde_json::from_value(json!({
            "packageId": "pkg1",
            "name": "site",
            "version": "1.0"
        }))
        .unwrap();
        assert_eq!(package.package_id, "pkg1");
        assert_eq!(package.name, "site");
    }

    #[test]
    fn test_args_serialize_camel_case() {
        let value = serde_json::to_value(NewPackageArgs {
            root_path: "/content/site".to_string(),
            name: "site".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({ "rootPath": "/content/site", "name": "site" }));

        let value = serde_json::to_value(InstallPackageArgs {
            package_id: "pkg1".to_string(),
            synchronous: true,
        })
        .unwrap();
        assert_eq!(value, json!({ "packageId": "pkg1", "synchronous": true }));

        let value = serde_json::to_value(PackageListArgs::default()).unwrap();
        assert_eq!(value, json!({}));
    }
}
