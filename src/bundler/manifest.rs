use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::security::path_policy::validate_skill_name;

const EXTENSIONS: &[&str] = &["toml", "yaml", "yml"];

/// A named, ordered group of skills installed together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleManifest {
    /// Defaults to the manifest's file stem when omitted.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<BundledSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundledSkill {
    pub name: String,
    /// Advisory only; never interpreted by the installer.
    #[serde(default)]
    pub scope: Option<String>,
}

impl BundleManifest {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|err| {
            SyncError::MalformedBundle(format!("bundle manifest TOML parse error: {err}"))
        })
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|err| {
            SyncError::MalformedBundle(format!("bundle manifest YAML parse error: {err}"))
        })
    }

    /// Parse and validate a manifest file, picking the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| SyncError::io(path, err))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let mut manifest = match ext {
            "yaml" | "yml" => Self::from_yaml_str(&raw),
            _ => Self::from_toml_str(&raw),
        }
        .map_err(|err| match err {
            SyncError::MalformedBundle(msg) => {
                SyncError::MalformedBundle(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        if manifest.name.trim().is_empty() {
            manifest.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
        }
        manifest.validate()?;
        Ok(manifest)
    }

    /// Find `<bundles_dir>/<name>.{toml,yaml,yml}` and load it.
    pub fn load_named(bundles_dir: &Path, name: &str) -> Result<Self> {
        validate_skill_name(name)
            .map_err(|err| SyncError::MalformedBundle(format!("bundle name: {err}")))?;
        for ext in EXTENSIONS {
            let path = bundles_dir.join(format!("{name}.{ext}"));
            if path.is_file() {
                return Self::load(&path);
            }
        }
        Err(SyncError::MalformedBundle(format!(
            "no bundle named {name} in {}",
            bundles_dir.display()
        )))
    }

    pub fn validate(&self) -> Result<()> {
        validate_required("name", &self.name)?;
        if self.skills.is_empty() {
            return Err(SyncError::MalformedBundle(format!(
                "bundle {} must list at least one skill",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for skill in &self.skills {
            validate_skill_name(&skill.name).map_err(|err| {
                SyncError::MalformedBundle(format!("bundle {}: {err}", self.name))
            })?;
            if !seen.insert(skill.name.as_str()) {
                return Err(SyncError::MalformedBundle(format!(
                    "bundle {}: duplicate skill name: {}",
                    self.name, skill.name
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|skill| skill.name.clone()).collect()
    }
}

/// Every manifest file in `bundles_dir`, sorted by path.
pub fn list_manifests(bundles_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if !bundles_dir.is_dir() {
        return Ok(paths);
    }
    for entry in fs::read_dir(bundles_dir).map_err(|err| SyncError::io(bundles_dir, err))? {
        let path = entry.map_err(|err| SyncError::io(bundles_dir, err))?.path();
        let known = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if path.is_file() && known {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SyncError::MalformedBundle(format!("{field} must be non-empty")));
    }
    Ok(())
}
