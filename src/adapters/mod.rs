//! Install adapters: where each AI tool keeps its skills.
//!
//! An adapter lives at `adapters/<name>/adapter.toml` in the canonical root:
//!
//! ```toml
//! dest = "~/.claude/skills"
//! description = "Claude Code user skills"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::installer::InstallPlan;
use crate::core::orchestrator::{UnitResult, UnitSpec, install_one, placeholder_value_for};
use crate::core::policy::PlaceholderPolicy;
use crate::core::root::CanonicalRoot;
use crate::error::{Result, SyncError};
use crate::security::{is_under_root, resolve_physical};

pub const ADAPTER_FILE: &str = "adapter.toml";
pub const CUSTOM_ADAPTER: &str = "custom";

/// A destination resolver paired with a unit installer.
pub trait Adapter {
    fn name(&self) -> &str;

    /// Directory that receives one subdirectory per installed skill.
    fn dest_root(&self) -> &Path;

    /// Value substituted for the placeholder token.
    fn placeholder_value(&self) -> String {
        placeholder_value_for(self.dest_root())
    }

    fn unit_for(&self, plan: &InstallPlan, skill: &str) -> UnitSpec {
        UnitSpec {
            skill: skill.to_string(),
            source_dir: plan.root.skill_dir(skill),
            dest_root: self.dest_root().to_path_buf(),
            placeholder_value: self.placeholder_value(),
            adapter: self.name().to_string(),
            bundle: plan.bundle.clone(),
            source_revision: plan.source_revision.clone(),
        }
    }

    fn install_unit(&self, unit: &UnitSpec, policy: &PlaceholderPolicy) -> UnitResult {
        install_one(unit, policy)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AdapterManifest {
    dest: String,
    #[serde(default)]
    description: Option<String>,
}

/// Adapter backed by a plain directory on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryAdapter {
    name: String,
    dest_root: PathBuf,
    description: Option<String>,
}

impl DirectoryAdapter {
    pub fn new(name: impl Into<String>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dest_root: dest_root.into(),
            description: None,
        }
    }

    /// Load `adapter_dir/adapter.toml`; the adapter is named after its directory.
    pub fn load(adapter_dir: &Path) -> Result<Self> {
        let path = adapter_dir.join(ADAPTER_FILE);
        let raw = fs::read_to_string(&path).map_err(|err| SyncError::io(&path, err))?;
        let manifest: AdapterManifest = toml::from_str(&raw)
            .map_err(|err| SyncError::Config(format!("parse adapter {}: {err}", path.display())))?;
        if manifest.dest.trim().is_empty() {
            return Err(SyncError::Config(format!(
                "adapter {} has an empty dest",
                path.display()
            )));
        }
        let name = adapter_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| SyncError::Config(format!("bad adapter dir {}", adapter_dir.display())))?;

        Ok(Self {
            name,
            dest_root: expand_home(manifest.dest.trim()),
            description: manifest.description,
        })
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Refuse destinations inside the canonical skills tree, following
    /// symlinks on both sides.
    pub fn ensure_outside(&self, root: &CanonicalRoot) -> Result<()> {
        let dest = resolve_physical(&self.dest_root);
        if is_under_root(&dest, &resolve_physical(&root.skills_dir())) {
            return Err(SyncError::Config(format!(
                "adapter {} installs into {}, which is inside the canonical skills directory",
                self.name,
                dest.display()
            )));
        }
        Ok(())
    }
}

impl Adapter for DirectoryAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn dest_root(&self) -> &Path {
        &self.dest_root
    }
}

/// Every adapter declared under the canonical root, sorted by name.
pub fn load_all(root: &CanonicalRoot) -> Result<Vec<DirectoryAdapter>> {
    let dir = root.adapters_dir();
    let mut adapters = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|err| SyncError::io(&dir, err))? {
        let path = entry.map_err(|err| SyncError::io(&dir, err))?.path();
        if path.join(ADAPTER_FILE).is_file() {
            adapters.push(DirectoryAdapter::load(&path)?);
        } else {
            debug!(path = %path.display(), "skipping entry without {ADAPTER_FILE}");
        }
    }
    adapters.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(adapters)
}

/// Adapters named in `names`, in that order; all adapters when empty.
pub fn select(root: &CanonicalRoot, names: &[String]) -> Result<Vec<DirectoryAdapter>> {
    let all = load_all(root)?;
    let selected = if names.is_empty() {
        all
    } else {
        names
            .iter()
            .map(|name| {
                all.iter()
                    .find(|adapter| &adapter.name == name)
                    .cloned()
                    .ok_or_else(|| SyncError::AdapterNotFound(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?
    };
    for adapter in &selected {
        adapter.ensure_outside(root)?;
    }
    Ok(selected)
}

/// Targets for one invocation: the named adapters (all when none are named)
/// plus a `custom` adapter for `dest`. A `dest` with no named adapters
/// installs only there.
pub fn resolve_targets(
    root: &CanonicalRoot,
    names: &[String],
    dest: Option<&Path>,
) -> Result<Vec<DirectoryAdapter>> {
    let mut targets = match dest {
        Some(_) if names.is_empty() => Vec::new(),
        _ => select(root, names)?,
    };
    if let Some(dest) = dest {
        let custom = DirectoryAdapter::new(CUSTOM_ADAPTER, dest);
        custom.ensure_outside(root)?;
        targets.push(custom);
    }
    if targets.is_empty() {
        return Err(SyncError::Config(format!(
            "no adapters declared in {} and no --dest given",
            root.adapters_dir().display()
        )));
    }
    Ok(targets)
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(value: &str) -> PathBuf {
    let rest = if value == "~" {
        Some("")
    } else {
        value.strip_prefix("~/").or_else(|| value.strip_prefix("~\\"))
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(value),
    }
}
