//! Common test utilities shared across integration tests.
//!
//! This module provides test helpers that can be used by all integration
//! and e2e tests without depending on the main crate's internal test utilities.

#![allow(dead_code)]

use std::path::Path;

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Lay out the three directories every canonical root needs.
pub fn canonical_layout(root: &Path) {
    for dir in ["skills", "bundles", "adapters"] {
        std::fs::create_dir_all(root.join(dir)).expect("Failed to create layout");
    }
}

/// The `foo` skill used by the end-to-end install scenarios: the token twice
/// in SKILL.md, once in scripts/run.sh, and a binary file without it.
pub fn foo_skill(root: &Path, token: &str) -> Vec<u8> {
    let skill = root.join("skills/foo");
    write_file(
        &skill.join("SKILL.md"),
        format!("# foo\n\nRun {token}/foo/scripts/run.sh\nDocs in {token}/foo/docs\n"),
    );
    write_file(
        &skill.join("scripts/run.sh"),
        format!("#!/bin/sh\nexec \"{token}/foo/.venv/bin/python\" main.py\n"),
    );
    let data = vec![0u8, 159, 146, 150, 255, 1, 2, 3];
    write_file(&skill.join("data.bin"), &data);
    data
}
