//! Single-request package commands: status, list, build, download, delete, install.

use super::CommandContext;
use crate::client::{InstallPackageArgs, PackageArgs, PackageListArgs};
use crate::deploy::report::report_lines;
use crate::reporter::{ConsoleReporter, Reporter};
use crate::utils::ProgressBar;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

fn print_json(value: &Value) -> Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Show the status of a package.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Remote package identifier
    pub package_id: String,
}

impl StatusCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let status = ctx.client.get_status(&PackageArgs::new(self.package_id)).await?;
        print_json(&status)
    }
}

/// List packages.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only list packages whose name contains this string
    #[arg(short, long)]
    pub name: Option<String>,
}

impl ListCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let args = self.name.map(|name| PackageListArgs { name: Some(name) });
        let packages = ctx.client.get_package_list(args.as_ref()).await?;
        print_json(&packages)
    }
}

/// Build a package.
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Remote package identifier
    pub package_id: String,
}

impl BuildCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let reporter = ConsoleReporter::new();
        reporter.start(&format!("Building package {}", self.package_id));
        let result = ctx.client.build_package(&PackageArgs::new(&self.package_id)).await;
        reporter.stop();

        let value = result?;
        reporter.succeed(&format!("Package {} built", self.package_id));
        print_json(&value)
    }
}

/// Download a package archive.
#[derive(Debug, Args)]
pub struct DownloadCommand {
    /// Remote package identifier
    pub package_id: String,

    /// Destination file (default `<package_id>.zip`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DownloadCommand {
    pub(crate) fn destination(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from(format!("{}.zip", self.package_id)))
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let destination = self.destination();
        let download = ctx.client.download_package(&PackageArgs::new(&self.package_id)).await?;

        let progress = match download.content_length() {
            Some(len) => ProgressBar::new_download(len),
            None => ProgressBar::new_spinner(),
        };
        progress.set_message(self.package_id.clone());

        let written = download
            .write_to(&destination, &progress)
            .await
            .with_context(|| format!("Failed to download {}", self.package_id))?;
        progress.finish_and_clear();

        ConsoleReporter::new().succeed(&format!(
            "Package {} downloaded to {} ({} bytes)",
            self.package_id,
            destination.display(),
            written
        ));
        Ok(())
    }
}

/// Delete a package.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Remote package identifier
    pub package_id: String,
}

impl DeleteCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        ctx.client.delete_package(&PackageArgs::new(&self.package_id)).await?;
        ConsoleReporter::new().succeed(&format!("Package {} deleted", self.package_id));
        Ok(())
    }
}

/// Install an uploaded package and report the changes.
#[derive(Debug, Args)]
pub struct InstallCommand {
    /// Remote package identifier
    pub package_id: String,
}

impl InstallCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let reporter = ConsoleReporter::new();
        reporter.start(&format!("Installing package {}", self.package_id));

        let args = InstallPackageArgs {
            package_id: self.package_id.clone(),
            synchronous: true,
        };
        let changes = match ctx.client.install_package(&args).await {
            Ok(changes) => changes,
            Err(e) => {
                reporter.stop();
                return Err(e.into());
            }
        };

        reporter.succeed(&format!(
            "Package {} installed on {}",
            self.package_id,
            ctx.client.address()
        ));
        for line in report_lines(&changes) {
            reporter.line(&line);
        }
        reporter.stop();
        Ok(())
    }
}
