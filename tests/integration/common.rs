//! Shared helpers for running the binary in isolation.

use assert_cmd::Command;
use crex_cli::constants::{NO_PROGRESS_ENV, PROXY_ENV_VARS, TARGET_ENV};
use std::path::Path;

pub use crex_cli::constants::API_ROOT_PATH as API;

/// A `crex` command with progress, colors and proxies disabled.
///
/// The config file is `<workdir>/config.toml`, which most tests never create.
pub fn crex(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("crex").unwrap();
    cmd.current_dir(workdir)
        .env(NO_PROGRESS_ENV, "1")
        .env("NO_COLOR", "1")
        .env_remove(TARGET_ENV)
        .env_remove("RUST_LOG");
    for name in PROXY_ENV_VARS {
        cmd.env_remove(name);
    }
    cmd.arg("--config").arg(workdir.join("config.toml"));
    cmd
}

/// Target address of a mock server with the default credentials.
pub fn target(server: &mockito::ServerGuard) -> String {
    format!("admin:admin@{}", server.host_with_port())
}
