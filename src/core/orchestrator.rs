//! One install unit: a single skill into a single destination root.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::core::policy::PlaceholderPolicy;
use crate::core::reconcile::{ReconcileSummary, reconcile};
use crate::core::stamp::{ProvenanceRecord, stamp};
use crate::core::substitute::substitute;
use crate::core::verify::find_remaining;
use crate::error::{Result, SyncError};
use crate::core::root::REQUIRED_DIRS;
use crate::security::path_policy::{paths_overlap, resolve_physical, validate_skill_name};

/// Everything needed to install one skill into one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpec {
    pub skill: String,
    /// Canonical `skills/<name>` directory.
    pub source_dir: PathBuf,
    /// Adapter root; the skill lands in `dest_root/<skill>`.
    pub dest_root: PathBuf,
    /// Value written in place of the placeholder token.
    pub placeholder_value: String,
    pub adapter: String,
    pub bundle: String,
    pub source_revision: String,
}

impl UnitSpec {
    #[must_use]
    pub fn dest_dir(&self) -> PathBuf {
        self.dest_root.join(&self.skill)
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{}@{}", self.skill, self.adapter)
    }
}

/// Placeholder value for a destination root: its absolute path.
#[must_use]
pub fn placeholder_value_for(dest_root: &Path) -> String {
    std::path::absolute(dest_root)
        .unwrap_or_else(|_| dest_root.to_path_buf())
        .display()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    Ok {
        patched: Vec<PathBuf>,
        reconcile: ReconcileSummary,
        provenance: PathBuf,
    },
    Failed {
        code: String,
        reason: String,
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitResult {
    pub skill: String,
    pub adapter: String,
    pub dest: PathBuf,
    #[serde(flatten)]
    pub outcome: UnitOutcome,
}

impl UnitResult {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.outcome, UnitOutcome::Ok { .. })
    }

    pub(crate) fn failed(unit: &UnitSpec, err: &SyncError) -> Self {
        Self {
            skill: unit.skill.clone(),
            adapter: unit.adapter.clone(),
            dest: unit.dest_dir(),
            outcome: UnitOutcome::Failed {
                code: err.code().to_string(),
                reason: err.to_string(),
                paths: err.paths(),
            },
        }
    }
}

/// Run reconcile, substitute, verify and stamp for one unit.
///
/// The first failing step ends the unit; its error is recorded in the
/// returned result rather than propagated.
pub fn install_one(unit: &UnitSpec, policy: &PlaceholderPolicy) -> UnitResult {
    match run_unit(unit, policy) {
        Ok(outcome) => {
            info!(unit = %unit.label(), dest = %unit.dest_dir().display(), "installed");
            UnitResult {
                skill: unit.skill.clone(),
                adapter: unit.adapter.clone(),
                dest: unit.dest_dir(),
                outcome,
            }
        }
        Err(err) => {
            warn!(unit = %unit.label(), scope = ?err.scope(), error = %err, "install failed");
            UnitResult::failed(unit, &err)
        }
    }
}

fn run_unit(unit: &UnitSpec, policy: &PlaceholderPolicy) -> Result<UnitOutcome> {
    validate_skill_name(&unit.skill)?;
    if !unit.source_dir.is_dir() {
        return Err(SyncError::SourceNotFound(unit.source_dir.clone()));
    }

    ensure_disjoint(unit)?;

    let dest = unit.dest_dir();
    let reconcile_summary = reconcile(&unit.source_dir, &dest, &policy.preserve)?;
    let patched = substitute(
        &dest,
        &policy.preserve,
        &policy.whitelist,
        &policy.token,
        &unit.placeholder_value,
    )?;

    let remaining = find_remaining(&dest, &policy.text_extensions, &policy.token)?;
    if !remaining.is_empty() {
        return Err(SyncError::WhitelistViolation {
            unit: unit.label(),
            paths: remaining,
        });
    }

    let record = ProvenanceRecord::new(&unit.skill, &unit.bundle, &unit.source_revision);
    let provenance = stamp(&dest, &policy.metadata_file, &record)?;

    Ok(UnitOutcome::Ok {
        patched,
        reconcile: reconcile_summary,
        provenance,
    })
}

/// Refuse a destination that overlaps the skill source, the canonical
/// directories beside it, or contains the canonical root itself.
///
/// `source_dir` is `<root>/skills/<name>`, so the root is two levels up.
/// Both sides are compared with symlinks resolved.
fn ensure_disjoint(unit: &UnitSpec) -> Result<()> {
    let dest = resolve_physical(&unit.dest_dir());
    let mut protected = vec![resolve_physical(&unit.source_dir)];
    let mut root = None;
    if let Some(skills_dir) = unit.source_dir.parent().map(resolve_physical) {
        if let Some(parent) = skills_dir.parent() {
            protected.extend(REQUIRED_DIRS.iter().map(|dir| parent.join(dir)));
            root = Some(parent.to_path_buf());
        }
        protected.push(skills_dir);
    }

    let clash = protected.iter().any(|path| paths_overlap(&dest, path))
        || root.as_deref().is_some_and(|root| root.starts_with(&dest));
    if clash {
        return Err(SyncError::io(
            &dest,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "destination overlaps the canonical tree at {}",
                    unit.source_dir.display()
                ),
            ),
        ));
    }
    Ok(())
}
