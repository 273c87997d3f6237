//! skillsync - install canonical skills into agent skill directories.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skillsync::SyncError;
use skillsync::cli::output::{emit_json, robot_error};
use skillsync::cli::{Cli, commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match commands::run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        // Completed, but at least one unit failed; details were already printed.
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            report_error(&cli, &e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(cli: &Cli, e: &SyncError) {
    if cli.robot {
        // Robot mode: JSON error output to stdout
        if emit_json(&robot_error(e.code(), e.to_string())).is_err() {
            eprintln!("Error: {e}");
        }
    } else {
        eprintln!("Error: {e}");
        for path in e.paths() {
            eprintln!("  {}", path.display());
        }
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,skillsync=info",
        1 => "info,skillsync=debug",
        2 => "debug,skillsync=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
