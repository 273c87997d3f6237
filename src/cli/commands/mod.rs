//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command
//!
//! `run` returns `Ok(false)` when the command completed but found failures
//! the process should report through its exit status.

use clap::Subcommand;

pub mod install;
pub mod list;
pub mod new;
pub mod root;
pub mod verify;

use crate::app::AppContext;
use crate::cli::Cli;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a bundle or individual skills into adapter destinations
    Install(install::InstallArgs),

    /// Create a new canonical skill from a template
    New(new::NewArgs),

    /// Show, set or forget the canonical root
    Root(root::RootArgs),

    /// List skills, bundles and adapters
    List(list::ListArgs),

    /// Check installed skills for unresolved placeholders
    Verify(verify::VerifyArgs),
}

/// Dispatch a command to its handler.
///
/// `root` runs without an [`AppContext`] so it works when no root resolves.
pub fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Root(args) => root::run(cli, args).map(|()| true),
        Commands::Install(args) => install::run(&AppContext::from_cli(cli)?, args),
        Commands::New(args) => new::run(&AppContext::from_cli(cli)?, args).map(|()| true),
        Commands::List(args) => list::run(&AppContext::from_cli(cli)?, args).map(|()| true),
        Commands::Verify(args) => verify::run(&AppContext::from_cli(cli)?, args),
    }
}
