//! Bundle manifests: ordered lists of skills installed together.

pub mod manifest;

pub use manifest::{BundleManifest, BundledSkill, list_manifests};

pub const DEFAULT_BUNDLE: &str = "default";

/// Bundle label recorded for skills named directly on the command line.
pub const ADHOC_BUNDLE: &str = "adhoc";
