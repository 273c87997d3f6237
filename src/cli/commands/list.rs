//! skillsync list - skills, bundles and adapters under the canonical root

use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::adapters::{Adapter, load_all};
use crate::app::AppContext;
use crate::bundler::{BundleManifest, list_manifests};
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::core::root::CanonicalRoot;
use crate::error::{Result, SyncError};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only list bundles
    #[arg(long, conflicts_with = "adapters")]
    pub bundles: bool,

    /// Only list adapters
    #[arg(long)]
    pub adapters: bool,
}

#[derive(Debug, Serialize)]
struct BundleEntry {
    name: String,
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AdapterEntry {
    name: String,
    dest: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct Listing {
    root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundles: Option<Vec<BundleEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adapters: Option<Vec<AdapterEntry>>,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let root = ctx.root();
    let everything = !args.bundles && !args.adapters;

    let listing = Listing {
        root: root.path().to_path_buf(),
        skills: everything.then(|| skill_names(root)).transpose()?,
        bundles: (everything || args.bundles).then(|| bundles(root)).transpose()?,
        adapters: (everything || args.adapters).then(|| adapters(root)).transpose()?,
    };

    if ctx.robot_mode {
        return emit_json(&robot_ok(&listing));
    }
    emit_human(render_human(&listing));
    Ok(())
}

fn skill_names(root: &CanonicalRoot) -> Result<Vec<String>> {
    let dir = root.skills_dir();
    let mut names = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|err| SyncError::io(&dir, err))? {
        let entry = entry.map_err(|err| SyncError::io(&dir, err))?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Every bundle file; a broken one is listed with its error instead of
/// failing the whole listing.
fn bundles(root: &CanonicalRoot) -> Result<Vec<BundleEntry>> {
    let entries = list_manifests(&root.bundles_dir())?
        .into_iter()
        .map(|path| match BundleManifest::load(&path) {
            Ok(manifest) => BundleEntry {
                skills: manifest.skill_names(),
                name: manifest.name,
                description: manifest.description,
                path,
                error: None,
            },
            Err(err) => {
                debug!(path = %path.display(), error = %err, "unreadable bundle");
                BundleEntry {
                    name: path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    path,
                    description: None,
                    skills: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        })
        .collect();
    Ok(entries)
}

fn adapters(root: &CanonicalRoot) -> Result<Vec<AdapterEntry>> {
    Ok(load_all(root)?
        .into_iter()
        .map(|adapter| AdapterEntry {
            name: adapter.name().to_string(),
            dest: adapter.dest_root().to_path_buf(),
            description: adapter.description().map(ToString::to_string),
        })
        .collect())
}

fn render_human(listing: &Listing) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title("skillsync")
        .kv("Root", &listing.root.display().to_string())
        .blank();

    if let Some(skills) = &listing.skills {
        layout.section(&format!("Skills ({})", skills.len()));
        for skill in skills {
            layout.bullet(skill);
        }
        layout.blank();
    }

    if let Some(bundles) = &listing.bundles {
        layout.section(&format!("Bundles ({})", bundles.len()));
        for bundle in bundles {
            match &bundle.error {
                Some(error) => layout.bullet(&format!("{} (invalid: {error})", bundle.name)),
                None => layout.bullet(&format!("{}: {}", bundle.name, bundle.skills.join(", "))),
            };
        }
        layout.blank();
    }

    if let Some(adapters) = &listing.adapters {
        layout.section(&format!("Adapters ({})", adapters.len()));
        for adapter in adapters {
            layout.kv(&adapter.name, &adapter.dest.display().to_string());
        }
    }
    layout
}
