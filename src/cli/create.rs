//! `crex create`.

use super::CommandContext;
use crate::core::Reported;
use crate::create::create_package;
use crate::reporter::ConsoleReporter;
use anyhow::{Context, Result};
use clap::Args;

/// Create a package from a repository path.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Repository path to package; a leading `/` is added when missing
    pub path: String,

    /// Name of the new package
    #[arg(short, long)]
    pub name: String,
}

impl CreateCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        create_package(&ctx.client, &self.path, &self.name, ConsoleReporter::new())
            .await
            .map(|_| ())
            .context(Reported("Create failed".to_string()))
    }
}
