//! New skill creation from templates under `templates/<name>`.
//!
//! Template files may use `__SKILL_NAME__` and `__SKILL_DESCRIPTION__`,
//! which are filled in here. The install placeholder token is left alone;
//! it is resolved per adapter at install time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::policy::PlaceholderPolicy;
use crate::core::reconcile::reconcile;
use crate::core::root::CanonicalRoot;
use crate::error::{Result, SyncError};
use crate::security::validate_skill_name;
use crate::utils::ensure_dir;

pub const DEFAULT_TEMPLATE: &str = "python-venv";
pub const NAME_TOKEN: &str = "__SKILL_NAME__";
pub const DESCRIPTION_TOKEN: &str = "__SKILL_DESCRIPTION__";

#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub description: String,
    pub template: String,
    pub force: bool,
}

impl NewSkill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "Describe what this skill does.".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            force: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scaffolded {
    pub skill_dir: PathBuf,
    pub template: String,
    /// True when the built-in template was used because none was on disk.
    pub builtin: bool,
    pub files: usize,
}

/// Create `skills/<name>` from a template.
pub fn create_skill(
    root: &CanonicalRoot,
    request: &NewSkill,
    policy: &PlaceholderPolicy,
) -> Result<Scaffolded> {
    validate_skill_name(&request.name)?;
    validate_skill_name(&request.template)
        .map_err(|err| SyncError::Config(format!("template name: {err}")))?;

    let skill_dir = root.skill_dir(&request.name);
    if skill_dir.exists() {
        if !request.force {
            return Err(SyncError::Config(format!(
                "skill {} already exists at {} (use --force to replace it)",
                request.name,
                skill_dir.display()
            )));
        }
        debug!(path = %skill_dir.display(), "replacing existing skill");
    }

    let template_dir = root.templates_dir().join(&request.template);
    let builtin = if template_dir.is_dir() {
        reconcile(&template_dir, &skill_dir, &std::collections::BTreeSet::new())?;
        false
    } else if request.template == DEFAULT_TEMPLATE {
        if skill_dir.exists() {
            fs::remove_dir_all(&skill_dir).map_err(|err| SyncError::io(&skill_dir, err))?;
        }
        write_builtin_template(&skill_dir, &policy.token)?;
        true
    } else {
        return Err(SyncError::Config(format!(
            "template {} not found in {} (available: {})",
            request.template,
            root.templates_dir().display(),
            available_templates(root).join(", ")
        )));
    };

    let files = fill_template(&skill_dir, request, policy)?;
    info!(skill = %request.name, template = %request.template, "created skill");

    Ok(Scaffolded {
        skill_dir,
        template: request.template.clone(),
        builtin,
        files,
    })
}

/// Template directory names, sorted.
#[must_use]
pub fn available_templates(root: &CanonicalRoot) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.templates_dir())
        .into_iter()
        .flatten()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Replace the name and description markers in every text file.
fn fill_template(skill_dir: &Path, request: &NewSkill, policy: &PlaceholderPolicy) -> Result<usize> {
    let mut files = 0;
    for entry in WalkDir::new(skill_dir) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(skill_dir).to_path_buf();
            SyncError::io(path, std::io::Error::other(err.to_string()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        files += 1;
        if !(policy.is_scanned(entry.path()) || policy.is_whitelisted(entry.path())) {
            continue;
        }
        let Ok(text) = fs::read_to_string(entry.path()) else {
            continue;
        };
        if !text.contains(NAME_TOKEN) && !text.contains(DESCRIPTION_TOKEN) {
            continue;
        }
        let filled = text
            .replace(NAME_TOKEN, &request.name)
            .replace(DESCRIPTION_TOKEN, &request.description);
        fs::write(entry.path(), filled).map_err(|err| SyncError::io(entry.path(), err))?;
    }
    Ok(files)
}

fn write_builtin_template(skill_dir: &Path, install_token: &str) -> Result<()> {
    let scripts = skill_dir.join("scripts");
    ensure_dir(&scripts)?;

    let skill_md = format!(
        "---\nname: {NAME_TOKEN}\ndescription: {DESCRIPTION_TOKEN}\n---\n\n\
         # {NAME_TOKEN}\n\n{DESCRIPTION_TOKEN}\n\n## Usage\n\n\
         ```sh\n{install_token}/{NAME_TOKEN}/scripts/run.sh <path>\n```\n"
    );
    let run_sh = format!(
        "#!/usr/bin/env sh\nset -e\nSKILL_DIR=\"{install_token}/{NAME_TOKEN}\"\n\
         exec \"$SKILL_DIR/.venv/bin/python\" \"$SKILL_DIR/scripts/main.py\" \"$@\"\n"
    );
    let main_py = format!(
        "import argparse\n\n\n\
         def main():\n    \
         ap = argparse.ArgumentParser(description=\"{NAME_TOKEN}: {DESCRIPTION_TOKEN}\")\n    \
         ap.add_argument(\"path\", nargs=\"?\", default=\".\", help=\"Input path (file or folder)\")\n    \
         args = ap.parse_args()\n\n    \
         print(f\"[{NAME_TOKEN}] path={{args.path}}\")\n\n\n\
         if __name__ == \"__main__\":\n    main()\n"
    );

    for (path, body) in [
        (skill_dir.join("SKILL.md"), skill_md),
        (scripts.join("run.sh"), run_sh),
        (scripts.join("main.py"), main_py),
    ] {
        fs::write(&path, body).map_err(|err| SyncError::io(&path, err))?;
    }
    Ok(())
}
