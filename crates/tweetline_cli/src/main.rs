//! Command-line dispatch for Tweetline.
//!
//! # Responsibility
//! - Map command-line calls onto the tweet service operations.
//! - Print each result as a JSON envelope; exit non-zero on failure.

use clap::Parser;
use std::process::ExitCode;
use tweetline_core::{default_log_level, init_logging};

mod cli;
mod commands;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    if commands::run_command(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
