//! Configuration for CREX commands.
//!
//! Two layers feed every command:
//!
//! 1. **Global configuration** (`~/.crex/config.toml`, see [`GlobalConfig`]) with a
//!    default target address and default ignore patterns.
//! 2. **Command-line flags and environment** (`--target`, `CREX_TARGET`, `--omit`, ...).
//!
//! Flags and environment win over the file; the built-in constants in
//! [`crate::constants`] apply when neither provides a value.
//!
//! [`DeployConfig`] is the resolved input of one `crex upload` run.

pub mod global;

pub use global::GlobalConfig;

use crate::constants::{DEFAULT_ARCHIVE_NAME, DEFAULT_OMIT_PATTERNS};
use crate::client::ClientOptions;

/// Resolved inputs of the deployment pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Build the archive from `compress_folders` before uploading
    pub compress: bool,
    /// Folders packed into the archive, in declaration order
    pub compress_folders: Vec<String>,
    /// Ignore patterns applied while packing
    pub omit: Vec<String>,
    /// Archive path: the file uploaded, and the file written when compressing
    pub package_name: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            compress: false,
            compress_folders: Vec::new(),
            omit: default_omit(),
            package_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

fn default_omit() -> Vec<String> {
    DEFAULT_OMIT_PATTERNS.iter().map(|p| (*p).to_string()).collect()
}

/// Pick the ignore patterns for a run.
///
/// Patterns from the command line replace those from the config file; the
/// built-in defaults apply only when both are empty.
#[must_use]
pub fn resolve_omit(flags: Vec<String>, global: &GlobalConfig) -> Vec<String> {
    if !flags.is_empty() {
        flags
    } else if !global.omit.is_empty() {
        global.omit.clone()
    } else {
        default_omit()
    }
}

/// Build client options from the `--target` flag, the config file and the defaults.
#[must_use]
pub fn resolve_client_options(target: Option<&str>, global: &GlobalConfig) -> ClientOptions {
    match target.or(global.target.as_deref()) {
        Some(address) => ClientOptions::from_address(address),
        None => ClientOptions::default(),
    }
}
