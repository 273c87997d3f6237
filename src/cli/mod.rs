//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod output;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "skillsync", version, about = "Install canonical skills into agent skill directories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit JSON on stdout for machine consumers
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file replacing the global and project config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Canonical root, skipping root discovery
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,
}
