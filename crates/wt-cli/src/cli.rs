//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::intervals::IntervalsArgs;
use crate::commands::sync::SyncArgs;

/// Wake-time tracker.
///
/// Reconstructs awake time from the machine's power log and records it in
/// Hakuna without duplicating existing entries.
#[derive(Debug, Parser)]
#[command(name = "wt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show awake intervals per day.
    Intervals(IntervalsArgs),

    /// Submit completed days' awake intervals to Hakuna.
    Sync(SyncArgs),
}
