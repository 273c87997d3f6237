//! Path safety checks for skill names and install destinations.

pub mod path_policy;

pub use path_policy::{
    PathPolicyViolation, is_under_root, paths_overlap, resolve_physical, validate_skill_name,
};
