//! Utility functions and helpers.

pub mod fs;
pub mod git;

pub use fs::*;
