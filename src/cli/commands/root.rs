//! skillsync root - show, set or forget the canonical root

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::cli::Cli;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::core::root::{Resolution, RootResolver, RootSource};
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct RootArgs {
    /// Validate PATH and save it as the canonical root
    #[arg(long, value_name = "PATH", conflicts_with = "forget")]
    pub set: Option<PathBuf>,

    /// Remove the saved root pointer
    #[arg(long)]
    pub forget: bool,
}

#[derive(Serialize)]
struct RootReport {
    root: Option<PathBuf>,
    source: Option<RootSource>,
    pointer: Option<PathBuf>,
    action: &'static str,
}

/// `--set` and `--forget` must work when no root resolves, so this reads
/// the global flags directly instead of an `AppContext`.
pub fn run(cli: &Cli, args: &RootArgs) -> Result<()> {
    let resolver = RootResolver::from_env();
    if let Some(report) = apply_change(&resolver, args)? {
        return emit(cli.robot, &report);
    }

    let resolution = match &cli.root {
        Some(path) => resolver.explicit(path)?,
        None => resolver.resolve_and_persist(&std::env::current_dir()?)?,
    };
    emit(cli.robot, &shown(&resolver, &resolution))
}

fn apply_change(resolver: &RootResolver, args: &RootArgs) -> Result<Option<RootReport>> {
    if args.forget {
        let removed = resolver.forget()?;
        return Ok(Some(RootReport {
            root: None,
            source: None,
            pointer: resolver.pointer_path().map(Path::to_path_buf),
            action: if removed { "forgotten" } else { "nothing_saved" },
        }));
    }

    let Some(path) = &args.set else {
        return Ok(None);
    };
    let resolution = resolver.explicit(path)?;
    let pointer = resolver.persist(&resolution)?;
    Ok(Some(RootReport {
        root: Some(resolution.root.path().to_path_buf()),
        source: Some(resolution.source),
        pointer: Some(pointer),
        action: "saved",
    }))
}

fn shown(resolver: &RootResolver, resolution: &Resolution) -> RootReport {
    RootReport {
        root: Some(resolution.root.path().to_path_buf()),
        source: Some(resolution.source),
        pointer: resolver.pointer_path().map(Path::to_path_buf),
        action: "resolved",
    }
}

fn emit(robot: bool, report: &RootReport) -> Result<()> {
    if robot {
        return emit_json(&robot_ok(report));
    }

    let mut layout = HumanLayout::new();
    layout.title("Canonical root");
    match report.action {
        "forgotten" => {
            layout.push_line("Saved root pointer removed.");
        }
        "nothing_saved" => {
            layout.push_line("No saved root pointer.");
        }
        _ => {
            if let Some(root) = &report.root {
                layout.kv("Root", &root.display().to_string());
            }
            if let Some(source) = &report.source {
                layout.kv("Found via", &source.to_string());
            }
        }
    }
    if let Some(pointer) = &report.pointer {
        layout.kv("Pointer file", &pointer.display().to_string());
    }
    emit_human(layout);
    Ok(())
}
