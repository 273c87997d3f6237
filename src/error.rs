//! Error types for skillsync.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Whether an error aborts a single install unit or the whole invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Unit,
    Invocation,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("skill source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "placeholder left unresolved in {unit} ({} file(s): {}); add the file name to \
         [install].whitelist or remove the placeholder from the canonical source",
        .paths.len(),
        join_paths(.paths)
    )]
    WhitelistViolation { unit: String, paths: Vec<PathBuf> },

    #[error("canonical root not resolved: {0}")]
    RootNotResolved(String),

    #[error("malformed bundle: {0}")]
    MalformedBundle(String),

    #[error("invalid skill name: {0}")]
    InvalidSkillName(String),

    #[error("adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Plain(#[from] std::io::Error),
}

impl SyncError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub const fn scope(&self) -> ErrorScope {
        match self {
            Self::SourceNotFound(_)
            | Self::Io { .. }
            | Self::WhitelistViolation { .. }
            | Self::InvalidSkillName(_)
            | Self::Plain(_) => ErrorScope::Unit,
            Self::RootNotResolved(_)
            | Self::MalformedBundle(_)
            | Self::AdapterNotFound(_)
            | Self::Config(_)
            | Self::Git(_)
            | Self::Serialization(_) => ErrorScope::Invocation,
        }
    }

    /// Stable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "source_not_found",
            Self::Io { .. } | Self::Plain(_) => "io_error",
            Self::WhitelistViolation { .. } => "whitelist_violation",
            Self::RootNotResolved(_) => "root_not_resolved",
            Self::MalformedBundle(_) => "malformed_bundle",
            Self::InvalidSkillName(_) => "invalid_skill_name",
            Self::AdapterNotFound(_) => "adapter_not_found",
            Self::Config(_) => "config_error",
            Self::Git(_) => "git_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Paths the error points at, for reporting.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        match self {
            Self::SourceNotFound(path) | Self::Io { path, .. } => vec![path.clone()],
            Self::WhitelistViolation { paths, .. } => paths.clone(),
            _ => Vec::new(),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, SyncError>;
