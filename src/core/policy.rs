//! Placeholder policy: which files receive substitution, which files are
//! scanned for leftovers, and which directories survive reinstalls.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::InstallConfig;
use crate::error::{Result, SyncError};

pub const DEFAULT_TOKEN: &str = "__SKILLS_ROOT__";
pub const DEFAULT_METADATA_FILE: &str = ".skillsync.json";

pub const DEFAULT_PRESERVE: &[&str] = &[".venv", "output", "logs"];

pub const DEFAULT_WHITELIST: &[&str] = &["SKILL.md", "run.sh", "run.ps1", "setup.sh", "setup.ps1"];

/// Extensions the verifier treats as text. Broader than the whitelist.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    "md", "markdown", "txt", "rst", "sh", "bash", "zsh", "ps1", "psm1", "psd1", "bat", "cmd",
    "py", "pyw", "js", "mjs", "cjs", "ts", "rb", "pl", "lua", "json", "jsonc", "yaml", "yml",
    "toml", "ini", "cfg", "conf", "xml", "html", "csv", "env",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPolicy {
    pub token: String,
    pub preserve: BTreeSet<String>,
    pub whitelist: BTreeSet<String>,
    pub text_extensions: BTreeSet<String>,
    pub metadata_file: String,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            preserve: to_set(DEFAULT_PRESERVE),
            whitelist: to_set(DEFAULT_WHITELIST),
            text_extensions: to_set(DEFAULT_TEXT_EXTENSIONS),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
        }
    }
}

impl PlaceholderPolicy {
    /// Build a policy from the `[install]` config section.
    pub fn from_config(config: &InstallConfig) -> Result<Self> {
        let policy = Self {
            token: config.token.clone(),
            preserve: config.preserve.iter().cloned().collect(),
            whitelist: config.whitelist.iter().cloned().collect(),
            text_extensions: config
                .text_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            metadata_file: config.metadata_file.clone(),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(SyncError::Config("install.token cannot be empty".to_string()));
        }
        if self.metadata_file.is_empty() || self.metadata_file.contains(['/', '\\']) {
            return Err(SyncError::Config(format!(
                "install.metadata_file must be a plain file name, got {:?}",
                self.metadata_file
            )));
        }
        if self.preserve.contains(&self.metadata_file) {
            return Err(SyncError::Config(format!(
                "install.metadata_file {:?} collides with a preserved name",
                self.metadata_file
            )));
        }
        Ok(())
    }

    /// Replace the token, e.g. for a one-off install with a custom marker.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Whether a file's base name makes it eligible for substitution.
    #[must_use]
    pub fn is_whitelisted(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.whitelist.contains(name))
    }

    /// Whether the verifier should scan this file.
    #[must_use]
    pub fn is_scanned(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.text_extensions.contains(&ext.to_ascii_lowercase()))
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
