//! crex CLI entry point
//!
//! Parses arguments, sets up logging on stderr, runs the command and turns any
//! error into a colored message with a suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use crex_cli::cli::Cli;
use crex_cli::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let config = cli.build_config();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // SAFETY: the async runtime has not started, this is the only thread
    unsafe { config.apply_to_env() };

    if let Err(e) = run(cli, config) {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: crex_cli::cli::CliConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(cli.execute_with_config(config))
}
