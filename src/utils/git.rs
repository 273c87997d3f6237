//! Git utilities

use std::path::Path;

use git2::{Repository, Status, StatusOptions};
use tracing::debug;

use crate::error::Result;

pub const UNKNOWN_REVISION: &str = "unknown";

/// Short HEAD id of the repository containing `root`, suffixed with `-dirty`
/// when tracked files are modified. `"unknown"` outside a repository.
pub fn source_revision(root: &Path) -> String {
    match head_revision(root) {
        Ok(Some(revision)) => revision,
        Ok(None) => UNKNOWN_REVISION.to_string(),
        Err(err) => {
            debug!(root = %root.display(), error = %err, "could not read source revision");
            UNKNOWN_REVISION.to_string()
        }
    }
}

fn head_revision(root: &Path) -> Result<Option<String>> {
    let Ok(repo) = Repository::discover(root) else {
        return Ok(None);
    };
    // Unborn branch: no commits yet.
    let Ok(head) = repo.head() else {
        return Ok(None);
    };
    let commit = head.peel_to_commit()?;
    let short = commit.as_object().short_id()?;
    let mut revision = short.as_str().unwrap_or_default().to_string();

    let mut options = StatusOptions::new();
    options.include_untracked(false).include_ignored(false);
    let dirty = repo
        .statuses(Some(&mut options))?
        .iter()
        .any(|entry| entry.status() != Status::CURRENT);
    if dirty {
        revision.push_str("-dirty");
    }
    Ok(Some(revision))
}
