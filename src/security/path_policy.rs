//! Path validation for skill names and install destinations.
//!
//! Skill and bundle names become directory names under both the canonical
//! tree and every adapter root, so they must be a single, portable path
//! component. Destination roots must also never sit inside the canonical
//! skills directory, or reconciling would copy a tree into itself.
//!
//! # Example
//!
//! ```rust
//! use skillsync::security::path_policy::validate_skill_name;
//!
//! assert!(validate_skill_name("pdf-to-png").is_ok());
//! assert!(validate_skill_name("../escape").is_err());
//! ```

use std::path::{Component, Path, PathBuf};

use crate::error::SyncError;

/// Characters Windows refuses in file names; rejected everywhere so a
/// canonical tree stays installable on every platform.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Errors specific to path policy violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPolicyViolation {
    /// Path contains traversal sequences (.. or .)
    TraversalAttempt,
    /// Path component contains invalid characters
    InvalidComponent { component: String, reason: String },
}

impl std::fmt::Display for PathPolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TraversalAttempt => write!(f, "path contains traversal sequences"),
            Self::InvalidComponent { component, reason } => {
                write!(f, "invalid path component {component:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for PathPolicyViolation {}

impl From<PathPolicyViolation> for SyncError {
    fn from(violation: PathPolicyViolation) -> Self {
        Self::InvalidSkillName(violation.to_string())
    }
}

/// Validate a single path component (filename or directory name).
///
/// Rejects empty strings, `.`/`..`, directory separators and null bytes.
pub fn validate_path_component(component: &str) -> std::result::Result<(), PathPolicyViolation> {
    if component.is_empty() {
        return Err(invalid(component, "empty component"));
    }
    if component.contains('\0') {
        return Err(invalid(component, "contains null byte"));
    }
    if component == ".." || component == "." {
        return Err(PathPolicyViolation::TraversalAttempt);
    }
    if component.contains('/') || component.contains('\\') {
        return Err(invalid(component, "contains directory separator"));
    }
    Ok(())
}

/// Validate a skill (or bundle) name.
///
/// On top of [`validate_path_component`], rejects reserved characters,
/// control characters, a leading `-` or `.`, and trailing spaces or dots.
pub fn validate_skill_name(name: &str) -> std::result::Result<(), PathPolicyViolation> {
    validate_path_component(name)?;

    if let Some(ch) = name.chars().find(|ch| RESERVED_CHARS.contains(ch)) {
        return Err(invalid(name, &format!("contains reserved character {ch:?}")));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid(name, "contains control character"));
    }
    if name.starts_with('-') || name.starts_with('.') {
        return Err(invalid(name, "must not start with '-' or '.'"));
    }
    if name.ends_with(' ') || name.ends_with('.') {
        return Err(invalid(name, "must not end with a space or '.'"));
    }
    Ok(())
}

fn invalid(component: &str, reason: &str) -> PathPolicyViolation {
    PathPolicyViolation::InvalidComponent {
        component: component.to_string(),
        reason: reason.to_string(),
    }
}

/// Normalize a path by resolving `.` and `..` components lexically.
///
/// Does not touch the filesystem or resolve symlinks.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                let last = normalized.components().next_back();
                match last {
                    None | Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => {
                        normalized.pop();
                    }
                }
            }
            Component::CurDir => {}
            _ => normalized.push(component),
        }
    }

    normalized
}

/// Check if a path is contained within (or equal to) a root directory,
/// comparing normalized paths.
#[must_use]
pub fn is_under_root(path: &Path, root: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(root))
}

/// Absolute form of `path` with symlinks resolved in its longest existing
/// prefix. The missing remainder is appended as given.
#[must_use]
pub fn resolve_physical(path: &Path) -> PathBuf {
    let absolute = normalize_path(&std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()));
    canonical_prefix(&absolute).unwrap_or(absolute)
}

fn canonical_prefix(path: &Path) -> Option<PathBuf> {
    let mut missing = Vec::new();
    let mut existing = path;
    loop {
        if let Ok(real) = existing.canonicalize() {
            return Some(missing.iter().rev().fold(real, |acc: PathBuf, part| acc.join(part)));
        }
        missing.push(existing.file_name()?);
        existing = existing.parent()?;
    }
}

/// True when either path contains the other. Both sides should already be
/// resolved with [`resolve_physical`].
#[must_use]
pub fn paths_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
