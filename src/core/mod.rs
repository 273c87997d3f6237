//! Core sync engine: reconcile, substitute, verify, stamp, plus canonical
//! root discovery and the unit/bundle installers built on top of them.

pub mod installer;
pub mod orchestrator;
pub mod policy;
pub mod reconcile;
pub mod root;
pub mod stamp;
pub mod substitute;
pub mod verify;

pub use installer::{InstallPlan, InstallReport, install_many};
pub use orchestrator::{UnitOutcome, UnitResult, UnitSpec, install_one, placeholder_value_for};
pub use policy::PlaceholderPolicy;
pub use reconcile::{ReconcileSummary, reconcile};
pub use root::{CanonicalRoot, Resolution, RootResolver, RootSource};
pub use stamp::{ProvenanceRecord, stamp};
pub use substitute::substitute;
pub use verify::find_remaining;
