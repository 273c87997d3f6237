//! Install many units: every skill of a plan into every selected adapter.

use serde::Serialize;
use tracing::info;

use crate::adapters::Adapter;
use crate::bundler::BundleManifest;
use crate::core::orchestrator::UnitResult;
use crate::core::policy::PlaceholderPolicy;
use crate::core::root::CanonicalRoot;
use crate::error::{Result, SyncError};

/// Ordered list of skills to install, with the provenance shared by all units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub root: CanonicalRoot,
    pub bundle: String,
    pub skills: Vec<String>,
    pub source_revision: String,
}

impl InstallPlan {
    /// Plan for a bundle manifest. Every skill it names must exist in the
    /// canonical tree, otherwise the whole bundle is rejected.
    pub fn from_bundle(
        root: &CanonicalRoot,
        manifest: &BundleManifest,
        source_revision: impl Into<String>,
    ) -> Result<Self> {
        let missing: Vec<&str> = manifest
            .skills
            .iter()
            .map(|skill| skill.name.as_str())
            .filter(|name| !root.skill_dir(name).is_dir())
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::MalformedBundle(format!(
                "bundle {} references skills with no canonical directory under {}: {}",
                manifest.name,
                root.skills_dir().display(),
                missing.join(", ")
            )));
        }
        Ok(Self {
            root: root.clone(),
            bundle: manifest.name.clone(),
            skills: manifest.skill_names(),
            source_revision: source_revision.into(),
        })
    }

    /// Plan for skills named directly. Missing skills fail their own units.
    pub fn from_skills(
        root: &CanonicalRoot,
        bundle: impl Into<String>,
        skills: Vec<String>,
        source_revision: impl Into<String>,
    ) -> Self {
        Self {
            root: root.clone(),
            bundle: bundle.into(),
            skills,
            source_revision: source_revision.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub bundle: String,
    pub units: Vec<UnitResult>,
}

impl InstallReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.units.iter().all(UnitResult::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnitResult> {
        self.units.iter().filter(|unit| !unit.is_ok())
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_ok()).count()
    }
}

/// Install every skill of `plan` into every adapter, in plan order.
///
/// A failed unit never stops the units after it.
pub fn install_many(
    plan: &InstallPlan,
    adapters: &[&dyn Adapter],
    policy: &PlaceholderPolicy,
) -> InstallReport {
    let mut units = Vec::with_capacity(plan.skills.len() * adapters.len());
    for skill in &plan.skills {
        for adapter in adapters {
            let unit = adapter.unit_for(plan, skill);
            units.push(adapter.install_unit(&unit, policy));
        }
    }

    let report = InstallReport {
        bundle: plan.bundle.clone(),
        units,
    };
    info!(
        bundle = %report.bundle,
        succeeded = report.succeeded(),
        failed = report.units.len() - report.succeeded(),
        "install finished"
    );
    report
}
