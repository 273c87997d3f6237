use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::policy::{
    DEFAULT_METADATA_FILE, DEFAULT_PRESERVE, DEFAULT_TEXT_EXTENSIONS, DEFAULT_TOKEN,
    DEFAULT_WHITELIST,
};
use crate::error::{Result, SyncError};
use crate::utils::read_optional;

pub const PROJECT_CONFIG_FILE: &str = "skillsync.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    /// Layer defaults, config files and environment overrides.
    ///
    /// An explicit path (flag or `SKILLSYNC_CONFIG`) replaces both the global
    /// and the project file.
    pub fn load(explicit_path: Option<&Path>, root: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKILLSYNC_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(root) = root {
                if let Some(project) = Self::load_patch(&root.join(PROJECT_CONFIG_FILE))? {
                    config.merge_patch(project);
                }
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("skillsync/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        let Some(raw) = read_optional(path)? else {
            return Ok(None);
        };
        let patch = toml::from_str(&raw)
            .map_err(|err| SyncError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.install {
            self.install.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("SKILLSYNC_TOKEN") {
            if value.is_empty() {
                return Err(SyncError::Config("SKILLSYNC_TOKEN cannot be empty".to_string()));
            }
            self.install.token = value;
        }
        if let Some(values) = lookup("SKILLSYNC_PRESERVE").map(|v| split_list(&v)) {
            self.install.preserve = merge_unique(values, &self.install.preserve);
        }
        if let Some(values) = lookup("SKILLSYNC_WHITELIST").map(|v| split_list(&v)) {
            self.install.whitelist = merge_unique(values, &self.install.whitelist);
        }
        if let Some(values) = lookup("SKILLSYNC_TEXT_EXTENSIONS").map(|v| split_list(&v)) {
            self.install.text_extensions = merge_unique(values, &self.install.text_extensions);
        }
        if lookup("SKILLSYNC_ROBOT").is_some_and(|v| parse_bool(&v)) {
            self.robot.format = "json".to_string();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub token: String,
    pub preserve: Vec<String>,
    pub whitelist: Vec<String>,
    pub text_extensions: Vec<String>,
    pub metadata_file: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            preserve: to_vec(DEFAULT_PRESERVE),
            whitelist: to_vec(DEFAULT_WHITELIST),
            text_extensions: to_vec(DEFAULT_TEXT_EXTENSIONS),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
        }
    }
}

impl InstallConfig {
    fn merge(&mut self, patch: InstallPatch) {
        if let Some(value) = patch.token {
            self.token = value;
        }
        if let Some(value) = patch.preserve {
            self.preserve = value;
        }
        if let Some(value) = patch.whitelist {
            self.whitelist = value;
        }
        if let Some(value) = patch.text_extensions {
            self.text_extensions = value;
        }
        if let Some(value) = patch.metadata_file {
            self.metadata_file = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub format: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub install: Option<InstallPatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct InstallPatch {
    pub token: Option<String>,
    pub preserve: Option<Vec<String>>,
    pub whitelist: Option<Vec<String>>,
    pub text_extensions: Option<Vec<String>>,
    pub metadata_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub format: Option<String>,
}

fn to_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn merge_unique(values: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values.into_iter().chain(existing.iter().cloned()) {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
