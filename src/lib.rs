//! skillsync - install canonical skills into agent skill directories.
//!
//! A canonical root holds `skills/`, `bundles/` and `adapters/`. Installing
//! mirrors each skill into every adapter's destination, rewrites the
//! placeholder token in whitelisted files, verifies nothing was missed and
//! stamps provenance metadata.

pub mod adapters;
pub mod app;
pub mod bundler;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod scaffold;
pub mod security;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use error::{ErrorScope, Result, SyncError};
