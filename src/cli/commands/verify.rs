//! skillsync verify - scan installed skills for unresolved placeholders

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::adapters::{Adapter, resolve_targets};
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok, robot_partial, status_mark};
use crate::core::policy::PlaceholderPolicy;
use crate::core::stamp::ProvenanceRecord;
use crate::core::verify::find_remaining;
use crate::error::{Result, SyncError};

#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Adapter to check; repeatable (default: all declared adapters)
    #[arg(long = "adapter", short, value_name = "NAME")]
    pub adapters: Vec<String>,

    /// Extra destination root to check
    #[arg(long, value_name = "PATH")]
    pub dest: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct VerifiedSkill {
    skill: String,
    adapter: String,
    dest: PathBuf,
    remaining: Vec<PathBuf>,
    provenance: Option<ProvenanceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provenance_error: Option<String>,
}

impl VerifiedSkill {
    fn is_clean(&self) -> bool {
        self.remaining.is_empty()
    }
}

pub fn run(ctx: &AppContext, args: &VerifyArgs) -> Result<bool> {
    let targets = resolve_targets(ctx.root(), &args.adapters, args.dest.as_deref())?;

    let mut checked = Vec::new();
    for adapter in &targets {
        checked.extend(verify_adapter(adapter, &ctx.policy)?);
    }

    let dirty = checked.iter().filter(|s| !s.is_clean()).count();
    if ctx.robot_mode {
        if dirty == 0 {
            emit_json(&robot_ok(&checked))?;
        } else {
            emit_json(&robot_partial(&checked, checked.len() - dirty, dirty))?;
        }
    } else {
        emit_human(render_human(&checked, dirty));
    }
    Ok(dirty == 0)
}

/// Check every skill under the adapter's root that carries a provenance
/// record. Skills installed by other tools are left alone.
fn verify_adapter(adapter: &dyn Adapter, policy: &PlaceholderPolicy) -> Result<Vec<VerifiedSkill>> {
    let root = adapter.dest_root();
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut skills = Vec::new();
    for dir in installed_dirs(root, &policy.metadata_file)? {
        let skill = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let (provenance, provenance_error) =
            match ProvenanceRecord::read(&dir, &policy.metadata_file) {
                Ok(record) => (record, None),
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "unreadable provenance record");
                    (None, Some(err.to_string()))
                }
            };
        skills.push(VerifiedSkill {
            remaining: find_remaining(&dir, &policy.text_extensions, &policy.token)?,
            provenance,
            provenance_error,
            adapter: adapter.name().to_string(),
            dest: dir,
            skill,
        });
    }
    Ok(skills)
}

fn installed_dirs(root: &Path, metadata_file: &str) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|err| SyncError::io(root, err))? {
        let path = entry.map_err(|err| SyncError::io(root, err))?.path();
        if path.join(metadata_file).is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn render_human(checked: &[VerifiedSkill], dirty: usize) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("Verify");
    if checked.is_empty() {
        layout.push_line("No installed skills found.");
        return layout;
    }

    for skill in checked {
        let revision = skill
            .provenance
            .as_ref()
            .map_or("unknown", |p| p.source_revision.as_str());
        layout.push_line(format!(
            "{} {}@{} ({revision})",
            status_mark(skill.is_clean()),
            skill.skill,
            skill.adapter
        ));
        if let Some(err) = &skill.provenance_error {
            layout.push_line(format!("    provenance: {err}"));
        }
        for path in &skill.remaining {
            layout.push_line(format!("    {}", path.display()));
        }
    }
    layout
        .blank()
        .kv("Checked", &checked.len().to_string())
        .kv("With placeholders", &dirty.to_string());
    layout
}
