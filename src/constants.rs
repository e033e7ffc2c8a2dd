//! Global constants used throughout the CREX codebase.
//!
//! This module contains the remote API layout, connection defaults, and the
//! environment variable names read by the client and the CLI. Defining them
//! centrally keeps magic strings discoverable.

/// Root path of the Creative Exchange API on the remote repository.
pub const API_ROOT_PATH: &str = "/apps/creative-exchange/api";

/// Default user for basic authentication.
pub const DEFAULT_USER: &str = "admin";

/// Default password for basic authentication.
pub const DEFAULT_PASSWORD: &str = "admin";

/// Default remote host name.
pub const DEFAULT_HOST: &str = "localhost";

/// Default remote port.
pub const DEFAULT_PORT: &str = "4502";

/// Proxy variables, in lookup order. The first one set wins.
pub const PROXY_ENV_VARS: [&str; 2] = ["https_proxy", "http_proxy"];

/// Disables spinners when set to any value.
pub const NO_PROGRESS_ENV: &str = "CREX_NO_PROGRESS";

/// Target address override for every command.
pub const TARGET_ENV: &str = "CREX_TARGET";

/// Archive name used by `upload --compress` when no package name is given.
pub const DEFAULT_ARCHIVE_NAME: &str = "package.zip";

/// Ignore patterns applied when neither `--omit` nor the config file provides any.
pub const DEFAULT_OMIT_PATTERNS: [&str; 2] = ["**/.git/**", "**/.DS_Store"];

/// Name of the multipart field carrying the uploaded package.
pub const UPLOAD_FIELD_NAME: &str = "file";
