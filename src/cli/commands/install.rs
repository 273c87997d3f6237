//! skillsync install - mirror skills into every adapter destination

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::debug;

use crate::adapters::{Adapter, resolve_targets};
use crate::app::AppContext;
use crate::bundler::{ADHOC_BUNDLE, BundleManifest, DEFAULT_BUNDLE};
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok, robot_partial, status_mark};
use crate::core::installer::{InstallPlan, InstallReport, install_many};
use crate::core::orchestrator::UnitOutcome;
use crate::error::Result;
use crate::utils::git::source_revision;

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Skills to install instead of a bundle
    #[arg(value_name = "SKILL", conflicts_with = "bundle")]
    pub skills: Vec<String>,

    /// Bundle to install (default: "default")
    #[arg(long, short)]
    pub bundle: Option<String>,

    /// Adapter to install into; repeatable (default: all declared adapters)
    #[arg(long = "adapter", short, value_name = "NAME")]
    pub adapters: Vec<String>,

    /// Extra destination root, installed as the "custom" adapter
    #[arg(long, value_name = "PATH")]
    pub dest: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &InstallArgs) -> Result<bool> {
    let root = ctx.root();
    let revision = source_revision(root.path());

    let plan = if args.skills.is_empty() {
        let name = args.bundle.as_deref().unwrap_or(DEFAULT_BUNDLE);
        let manifest = BundleManifest::load_named(&root.bundles_dir(), name)?;
        InstallPlan::from_bundle(root, &manifest, revision)?
    } else {
        InstallPlan::from_skills(root, ADHOC_BUNDLE, args.skills.clone(), revision)
    };

    let targets = resolve_targets(root, &args.adapters, args.dest.as_deref())?;
    let adapters: Vec<&dyn Adapter> = targets.iter().map(|a| a as &dyn Adapter).collect();
    debug!(
        bundle = %plan.bundle,
        skills = plan.skills.len(),
        adapters = adapters.len(),
        revision = %plan.source_revision,
        "install plan ready"
    );

    let report = install_many(&plan, &adapters, &ctx.policy);

    if ctx.robot_mode {
        let succeeded = report.succeeded();
        let failed = report.units.len() - succeeded;
        if failed == 0 {
            emit_json(&robot_ok(&report))?;
        } else {
            emit_json(&robot_partial(&report, succeeded, failed))?;
        }
    } else {
        emit_human(render_human(&plan, &report));
    }

    Ok(report.is_success())
}

fn render_human(plan: &InstallPlan, report: &InstallReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title("Install")
        .kv("Bundle", &plan.bundle)
        .kv("Root", &plan.root.path().display().to_string())
        .kv("Revision", &plan.source_revision)
        .blank();

    for unit in &report.units {
        layout.push_line(format!(
            "{} {} -> {} ({})",
            status_mark(unit.is_ok()),
            unit.skill.as_str().bold(),
            unit.adapter,
            unit.dest.display()
        ));
        if let UnitOutcome::Ok { patched, reconcile, .. } = &unit.outcome {
            if !patched.is_empty() || !reconcile.preserved.is_empty() {
                layout.push_line(format!(
                    "    {} patched, {} preserved",
                    patched.len(),
                    reconcile.preserved.len()
                ));
            }
        }
    }

    let failed = report.units.len() - report.succeeded();
    layout.blank();
    if failed == 0 {
        layout.push_line(
            format!("{} unit(s) installed", report.succeeded())
                .green()
                .to_string(),
        );
        return layout;
    }

    layout.push_line(
        format!("{} installed, {failed} failed", report.succeeded())
            .red()
            .bold()
            .to_string(),
    );
    layout.blank().section("Failures");
    for unit in report.failures() {
        if let UnitOutcome::Failed { code, reason, paths } = &unit.outcome {
            layout.bullet(&format!("{}@{} [{code}]: {reason}", unit.skill, unit.adapter));
            for path in paths {
                layout.push_line(format!("    {}", path.display()));
            }
        }
    }
    layout
}
