//! Placeholder substitution over whitelisted files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, SyncError};

const UTF8_BOM: &str = "\u{feff}";

/// Replace every occurrence of `token` with `value` in files under `dest`
/// whose base name is in `whitelist`.
///
/// Immediate children of `dest` named in `preserve` belong to the runtime
/// and are not entered. Files that are not valid UTF-8 are skipped. Files
/// without the token are left untouched. Returns the files that were
/// rewritten.
pub fn substitute(
    dest: &Path,
    preserve: &BTreeSet<String>,
    whitelist: &BTreeSet<String>,
    token: &str,
    value: &str,
) -> Result<Vec<PathBuf>> {
    if token.is_empty() {
        return Err(SyncError::Config("placeholder token cannot be empty".to_string()));
    }

    let walker = WalkDir::new(dest)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() != 1
                || entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !preserve.contains(name))
        });

    let mut patched = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dest).to_path_buf();
            SyncError::io(path, std::io::Error::other(err.to_string()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !whitelist.contains(name) {
            continue;
        }
        if patch_file(entry.path(), token, value)? {
            patched.push(entry.path().to_path_buf());
        }
    }
    debug!(dest = %dest.display(), patched = patched.len(), "substitution done");
    Ok(patched)
}

fn patch_file(path: &Path, token: &str, value: &str) -> Result<bool> {
    let bytes = fs::read(path).map_err(|err| SyncError::io(path, err))?;
    let Ok(text) = String::from_utf8(bytes) else {
        trace!(path = %path.display(), "skipping non-UTF-8 file");
        return Ok(false);
    };
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);
    if !text.contains(token) {
        return Ok(false);
    }
    let rewritten = text.replace(token, value);
    fs::write(path, rewritten).map_err(|err| SyncError::io(path, err))?;
    trace!(path = %path.display(), "patched");
    Ok(true)
}
