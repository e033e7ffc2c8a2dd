//! Command-line interface for CREX.
//!
//! Each subcommand lives in its own module and exposes an `execute` method that
//! receives a shared [`CommandContext`]: the loaded [`GlobalConfig`] and one
//! [`CrexClient`] built for the resolved target.
//!
//! # Commands
//!
//! - `upload` - Upload a package (optionally zipping folders first), install it, report changes
//! - `create` - Create a package from a repository path
//! - `status` - Show the status of a package
//! - `list` - List packages
//! - `build` - Build a package
//! - `download` - Download a package archive
//! - `delete` - Delete a package
//! - `install` - Install an uploaded package and report changes
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only
//! - `--no-progress` - Hide spinners and progress bars
//! - `--config` / `-c` - Path to the config file (default `~/.crex/config.toml`)
//! - `--target` / `-t` - Target address `user:password@host:port` (also `CREX_TARGET`)
//!
//! # Examples
//!
//! ```bash
//! # Zip jcr_root and META-INF, upload, install and print the change report
//! crex upload site.zip --compress jcr_root,META-INF --omit '**/*.tmp'
//!
//! # Create a package on another instance
//! crex --target deployer:s3cret@author:4503 create content/site --name site
//! ```

mod create;
mod package;
mod upload;


use crate::client::CrexClient;
use crate::config::{GlobalConfig, resolve_client_options};
use crate::constants::{NO_PROGRESS_ENV, TARGET_ENV};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Settings derived from the global flags, applied before any command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive
    pub log_level: String,
    /// Hide progress indicators
    pub no_progress: bool,
    /// Config file override
    pub config_path: Option<PathBuf>,
    /// Target address override
    pub target: Option<String>,
}

impl CliConfig {
    /// Export settings that are read through the environment.
    ///
    /// # Safety
    ///
    /// Mutates the process environment. Call it before any other thread exists.
    pub unsafe fn apply_to_env(&self) {
        if self.no_progress {
            // SAFETY: upheld by the caller
            unsafe { std::env::set_var(NO_PROGRESS_ENV, "1") };
        }
    }
}

/// Creative Exchange command-line client.
#[derive(Debug, Parser)]
#[command(
    name = "crex",
    about = "Upload, install and manage Creative Exchange packages",
    version,
    long_about = "crex zips local folders into a package, uploads it to a Creative Exchange \
                  endpoint, installs it synchronously and reports the files that changed."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hide spinners and progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    /// Target address, `user:password@host:port`
    #[arg(short, long, global = true, env = TARGET_ENV)]
    target: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload a package, install it and report the changes
    Upload(upload::UploadCommand),
    /// Create a package from a repository path
    Create(create::CreateCommand),
    /// Show the status of a package
    Status(package::StatusCommand),
    /// List packages
    List(package::ListCommand),
    /// Build a package
    Build(package::BuildCommand),
    /// Download a package archive
    Download(package::DownloadCommand),
    /// Delete a package
    Delete(package::DeleteCommand),
    /// Install an uploaded package and report the changes
    Install(package::InstallCommand),
}

/// What every command needs to talk to the remote system.
pub struct CommandContext {
    /// Loaded config file, or defaults
    pub global: GlobalConfig,
    /// Client for the resolved target
    pub client: CrexClient,
}

impl Cli {
    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
            target: self.target.clone(),
        }
    }

    /// Run the selected command with an already applied [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is invalid, the client cannot be built,
    /// or the command fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let global = GlobalConfig::load_with_optional(config.config_path.clone())
            .await
            .context("Failed to load configuration")?;
        let options = resolve_client_options(config.target.as_deref(), &global);
        debug!("Using target {}:{}", options.host, options.port);

        let client = CrexClient::new(options)?;
        let ctx = CommandContext { global, client };

        match self.command {
            Commands::Upload(cmd) => cmd.execute(&ctx).await,
            Commands::Create(cmd) => cmd.execute(&ctx).await,
            Commands::Status(cmd) => cmd.execute(&ctx).await,
            Commands::List(cmd) => cmd.execute(&ctx).await,
            Commands::Build(cmd) => cmd.execute(&ctx).await,
            Commands::Download(cmd) => cmd.execute(&ctx).await,
            Commands::Delete(cmd) => cmd.execute(&ctx).await,
            Commands::Install(cmd) => cmd.execute(&ctx).await,
        }
    }
}
