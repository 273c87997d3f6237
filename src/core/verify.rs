//! Leftover placeholder detection.
//!
//! Scans every file with a recognized text extension, not just the
//! substitution whitelist, so a token that leaked into an unexpected file
//! is still caught before the install is declared complete.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use memchr::memmem;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SyncError};

/// Return every scanned file under `dest` that still contains `token`.
pub fn find_remaining(
    dest: &Path,
    text_extensions: &BTreeSet<String>,
    token: &str,
) -> Result<Vec<PathBuf>> {
    if token.is_empty() {
        return Err(SyncError::Config("placeholder token cannot be empty".to_string()));
    }

    let finder = memmem::Finder::new(token.as_bytes());
    let mut remaining = Vec::new();

    for entry in WalkDir::new(dest).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dest).to_path_buf();
            SyncError::io(path, std::io::Error::other(err.to_string()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let scanned = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| text_extensions.contains(&ext.to_ascii_lowercase()));
        if !scanned {
            continue;
        }
        let bytes = fs::read(entry.path()).map_err(|err| SyncError::io(entry.path(), err))?;
        if finder.find(&bytes).is_some() {
            debug!(path = %entry.path().display(), "placeholder still present");
            remaining.push(entry.path().to_path_buf());
        }
    }

    remaining.sort();
    Ok(remaining)
}
