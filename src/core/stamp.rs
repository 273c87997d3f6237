//! Provenance record written at the root of every installed skill.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub skill: String,
    pub installed_at: String,
    pub bundle: String,
    pub source_revision: String,
    pub tool_version: String,
}

impl ProvenanceRecord {
    /// Build a record stamped with the current time and this binary's version.
    pub fn new(
        skill: impl Into<String>,
        bundle: impl Into<String>,
        source_revision: impl Into<String>,
    ) -> Self {
        Self::at(Utc::now(), skill, bundle, source_revision)
    }

    pub fn at(
        now: DateTime<Utc>,
        skill: impl Into<String>,
        bundle: impl Into<String>,
        source_revision: impl Into<String>,
    ) -> Self {
        Self {
            skill: skill.into(),
            installed_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            bundle: bundle.into(),
            source_revision: source_revision.into(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Read a previously written record, if any.
    pub fn read(dest: &Path, file_name: &str) -> Result<Option<Self>> {
        let path = dest.join(file_name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|err| SyncError::io(&path, err))?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

/// Write `record` to `dest/file_name`, replacing any previous record.
pub fn stamp(dest: &Path, file_name: &str, record: &ProvenanceRecord) -> Result<PathBuf> {
    let path = dest.join(file_name);
    let mut payload = serde_json::to_string_pretty(record)?;
    payload.push('\n');
    fs::write(&path, payload).map_err(|err| SyncError::io(&path, err))?;
    Ok(path)
}
