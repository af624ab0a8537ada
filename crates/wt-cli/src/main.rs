use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wt_cli::commands::{intervals, sync};
use wt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Logs go to stderr so stdout stays parseable; try_init tolerates an existing subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match command {
        Commands::Intervals(args) => intervals::run(&mut stdout, args, &config)?,
        Commands::Sync(args) => sync::run(&mut stdout, args, &config)?,
    }

    Ok(())
}
