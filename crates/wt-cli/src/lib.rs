//! Wake-time tracker CLI library.
//!
//! This crate provides the CLI interface: configuration, the power log
//! source and the `intervals` / `sync` commands.

mod cli;
pub mod commands;
mod config;
pub mod log_source;

pub use cli::{Cli, Commands};
pub use config::Config;
