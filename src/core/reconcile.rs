//! Tree reconciliation: force a destination back to its canonical source
//! while leaving preserved runtime directories alone.
//!
//! Two independent name checks drive the whole thing:
//! - removal skips immediate children of `dest` whose name is preserved;
//! - copying skips immediate children of `source` whose name is preserved
//!   *and* already present at `dest`.
//!
//! Everything else is deleted and copied fresh, so a reconciled tree never
//! depends on what the destination looked like before.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Immediate children of the destination that were deleted.
    pub removed: usize,
    /// Regular files copied from the source.
    pub copied_files: usize,
    /// Preserved names left untouched at the destination.
    pub preserved: Vec<String>,
    /// Preserved names copied because the destination did not have them yet.
    pub bootstrapped: Vec<String>,
}

/// Reconcile `dest` against `source`.
///
/// Preserved names are matched against immediate children only, and by name
/// regardless of entry type.
pub fn reconcile(source: &Path, dest: &Path, preserve: &BTreeSet<String>) -> Result<ReconcileSummary> {
    if !source.is_dir() {
        return Err(SyncError::SourceNotFound(source.to_path_buf()));
    }

    let mut summary = ReconcileSummary::default();

    if dest.exists() {
        if !dest.is_dir() {
            return Err(SyncError::io(
                dest,
                std::io::Error::other("destination exists and is not a directory"),
            ));
        }
        for entry in fs::read_dir(dest).map_err(|err| SyncError::io(dest, err))? {
            let entry = entry.map_err(|err| SyncError::io(dest, err))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if preserve.contains(&name) {
                debug!(name = %name, "keeping preserved entry");
                summary.preserved.push(name);
                continue;
            }
            remove_entry(&entry.path())?;
            summary.removed += 1;
        }
    } else {
        fs::create_dir_all(dest).map_err(|err| SyncError::io(dest, err))?;
    }

    for entry in fs::read_dir(source).map_err(|err| SyncError::io(source, err))? {
        let entry = entry.map_err(|err| SyncError::io(source, err))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if preserve.contains(&name) {
            if to.symlink_metadata().is_ok() {
                continue;
            }
            debug!(name = %name, "bootstrapping preserved entry from source");
            summary.bootstrapped.push(name);
        }
        summary.copied_files += copy_entry(&from, &to)?;
    }

    summary.preserved.sort();
    summary.bootstrapped.sort();
    Ok(summary)
}

fn remove_entry(path: &Path) -> Result<()> {
    let meta = path
        .symlink_metadata()
        .map_err(|err| SyncError::io(path, err))?;
    trace!(path = %path.display(), "removing");
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|err| SyncError::io(path, err))
    } else {
        fs::remove_file(path).map_err(|err| SyncError::io(path, err))
    }
}

/// Copy a file or a whole directory, returning the number of files written.
fn copy_entry(from: &Path, to: &Path) -> Result<usize> {
    if !from.is_dir() {
        fs::copy(from, to).map_err(|err| SyncError::io(from, err))?;
        return Ok(1);
    }

    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(from).to_path_buf();
            SyncError::io(path, std::io::Error::other(err.to_string()))
        })?;
        let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|err| SyncError::io(&target, err))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|err| SyncError::io(parent, err))?;
            }
            fs::copy(entry.path(), &target).map_err(|err| SyncError::io(entry.path(), err))?;
            copied += 1;
        }
    }
    Ok(copied)
}
