//! `crex upload`: the deployment pipeline.

use super::CommandContext;
use crate::config::{DeployConfig, resolve_omit};
use crate::constants::DEFAULT_ARCHIVE_NAME;
use crate::core::Reported;
use crate::deploy::Deployment;
use crate::reporter::ConsoleReporter;
use anyhow::Result;
use clap::Args;

/// Upload a package, install it and report the changes.
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Package file to upload, or to create when compressing
    #[arg(default_value = DEFAULT_ARCHIVE_NAME)]
    pub package: String,

    /// Zip these folders into the package first (comma separated or repeated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub compress: Vec<String>,

    /// Glob patterns to leave out of the package
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub omit: Vec<String>,
}

impl UploadCommand {
    pub(crate) fn deploy_config(self, ctx: &CommandContext) -> DeployConfig {
        DeployConfig {
            compress: !self.compress.is_empty(),
            compress_folders: self.compress,
            omit: resolve_omit(self.omit, &ctx.global),
            package_name: self.package,
        }
    }

    /// Run the pipeline; a failed stage has already been reported when this errors.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let config = self.deploy_config(ctx);
        let outcome = Deployment::new(&ctx.client, config, ConsoleReporter::new()).run().await;

        match outcome.failure {
            None => Ok(()),
            Some(failure) => {
                let reported = Reported(failure.to_string());
                Err(anyhow::Error::from(failure.error).context(reported))
            }
        }
    }
}
