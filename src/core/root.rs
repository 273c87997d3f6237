//! Canonical root discovery.
//!
//! Lookup order, first hit wins:
//! 1. `SKILLSYNC_ROOT`
//! 2. the pointer file under the user config directory
//! 3. walking upwards from the start directory
//!
//! [`RootResolver::resolve`] only reads. A root found by walking is written
//! to the pointer file by [`RootResolver::resolve_and_persist`], and a
//! failed write there is logged, never returned.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::Builder;
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};

pub const ROOT_ENV: &str = "SKILLSYNC_ROOT";
pub const POINTER_FILE: &str = "root.txt";
pub const REQUIRED_DIRS: &[&str] = &["skills", "bundles", "adapters"];

/// A directory that satisfies the canonical layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRoot {
    path: PathBuf,
}

impl CanonicalRoot {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn skills_dir(&self) -> PathBuf {
        self.path.join("skills")
    }

    #[must_use]
    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.skills_dir().join(name)
    }

    #[must_use]
    pub fn bundles_dir(&self) -> PathBuf {
        self.path.join("bundles")
    }

    #[must_use]
    pub fn adapters_dir(&self) -> PathBuf {
        self.path.join("adapters")
    }

    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.path.join("templates")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootSource {
    /// Passed on the command line.
    Explicit,
    Env,
    Pointer,
    Walk,
}

impl fmt::Display for RootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Explicit => "--root flag",
            Self::Env => "SKILLSYNC_ROOT environment variable",
            Self::Pointer => "saved root pointer",
            Self::Walk => "directory walk",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub root: CanonicalRoot,
    pub source: RootSource,
}

impl Resolution {
    #[must_use]
    pub fn should_persist(&self) -> bool {
        self.source == RootSource::Walk
    }
}

#[derive(Debug, Clone)]
pub struct RootResolver {
    env_value: Option<PathBuf>,
    pointer_path: Option<PathBuf>,
    required: Vec<String>,
}

impl RootResolver {
    pub fn new(env_value: Option<PathBuf>, pointer_path: Option<PathBuf>) -> Self {
        Self {
            env_value,
            pointer_path,
            required: REQUIRED_DIRS.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    /// Resolver reading the real environment and user config directory.
    #[must_use]
    pub fn from_env() -> Self {
        let env_value = std::env::var_os(ROOT_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::new(env_value, default_pointer_path())
    }

    #[must_use]
    pub fn pointer_path(&self) -> Option<&Path> {
        self.pointer_path.as_deref()
    }

    /// Whether `dir` contains every required subdirectory.
    #[must_use]
    pub fn satisfies_contract(&self, dir: &Path) -> bool {
        dir.is_dir() && self.required.iter().all(|name| dir.join(name).is_dir())
    }

    /// Validate a root given explicitly by the caller.
    pub fn explicit(&self, path: &Path) -> Result<Resolution> {
        if self.satisfies_contract(path) {
            return Ok(Resolution {
                root: CanonicalRoot { path: absolute(path) },
                source: RootSource::Explicit,
            });
        }
        Err(SyncError::RootNotResolved(format!(
            "{} is missing one of the required directories ({})",
            path.display(),
            self.required.join(", ")
        )))
    }

    /// Locate the canonical root without touching the filesystem.
    pub fn resolve(&self, start: &Path) -> Result<Resolution> {
        let mut tried = Vec::new();

        if let Some(env_root) = self.env_value.as_deref() {
            if self.satisfies_contract(env_root) {
                return Ok(self.found(env_root, RootSource::Env));
            }
            debug!(path = %env_root.display(), "{ROOT_ENV} does not point at a canonical root");
            tried.push(format!("{ROOT_ENV}={}", env_root.display()));
        }

        if let Some(pointer) = self.read_pointer() {
            if self.satisfies_contract(&pointer) {
                return Ok(self.found(&pointer, RootSource::Pointer));
            }
            debug!(path = %pointer.display(), "saved root pointer is stale");
            tried.push(format!("pointer {}", pointer.display()));
        }

        let start = absolute(start);
        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            if self.satisfies_contract(dir) {
                return Ok(self.found(dir, RootSource::Walk));
            }
            current = dir.parent();
        }
        tried.push(format!("walk up from {}", start.display()));

        Err(SyncError::RootNotResolved(format!(
            "no directory containing {} found (tried: {})",
            self.required.join(", "),
            tried.join("; ")
        )))
    }

    /// Resolve, then cache a walked result in the pointer file.
    pub fn resolve_and_persist(&self, start: &Path) -> Result<Resolution> {
        let resolution = self.resolve(start)?;
        if resolution.should_persist() {
            if let Err(err) = self.persist(&resolution) {
                warn!(error = %err, "could not save root pointer");
            }
        }
        Ok(resolution)
    }

    pub fn persist(&self, resolution: &Resolution) -> Result<PathBuf> {
        self.write_pointer(resolution.root.path())
    }

    /// Validate `path` and write it to the pointer file.
    pub fn set_pointer(&self, path: &Path) -> Result<PathBuf> {
        let resolution = self.explicit(path)?;
        self.write_pointer(resolution.root.path())
    }

    /// Remove the pointer file. Returns whether one existed.
    pub fn forget(&self) -> Result<bool> {
        let Some(pointer) = self.pointer_path.as_deref() else {
            return Ok(false);
        };
        match fs::remove_file(pointer) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(SyncError::io(pointer, err)),
        }
    }

    fn write_pointer(&self, root: &Path) -> Result<PathBuf> {
        let pointer = self.pointer_path.as_deref().ok_or_else(|| {
            SyncError::Config("no user config directory for the root pointer".to_string())
        })?;
        let dir = pointer
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|err| SyncError::io(dir, err))?;
        // Temp file beside the pointer, renamed over it.
        let mut temp = Builder::new()
            .prefix(".root-")
            .tempfile_in(dir)
            .map_err(|err| SyncError::io(dir, err))?;
        writeln!(temp, "{}", root.display()).map_err(|err| SyncError::io(temp.path(), err))?;
        temp.persist(pointer)
            .map_err(|err| SyncError::io(pointer, err.error))?;
        info!(root = %root.display(), pointer = %pointer.display(), "saved root pointer");
        Ok(pointer.to_path_buf())
    }

    fn read_pointer(&self) -> Option<PathBuf> {
        let pointer = self.pointer_path.as_deref()?;
        let raw = fs::read_to_string(pointer).ok()?;
        let line = raw.lines().next()?.trim();
        if line.is_empty() {
            None
        } else {
            Some(PathBuf::from(line))
        }
    }

    fn found(&self, path: &Path, source: RootSource) -> Resolution {
        debug!(root = %path.display(), %source, "resolved canonical root");
        Resolution {
            root: CanonicalRoot { path: absolute(path) },
            source,
        }
    }
}

#[must_use]
pub fn default_pointer_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("skillsync").join(POINTER_FILE))
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
