//! E2E Scenario: Install Workflow
//!
//! A skill is installed, hand-edited at its destination, then reinstalled:
//! preserved entries survive, everything else is reset to canonical content.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use skillsync::core::{PlaceholderPolicy, UnitOutcome, UnitSpec, install_one};

use super::common::{count, foo_skill, read, write_file};
use super::fixture::E2EFixture;

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn narrow_policy() -> PlaceholderPolicy {
    PlaceholderPolicy {
        token: "__ROOT__".to_string(),
        preserve: set(&[".venv", "output"]),
        whitelist: set(&["SKILL.md", "run.sh"]),
        ..PlaceholderPolicy::default()
    }
}

fn unit(fixture: &E2EFixture) -> UnitSpec {
    UnitSpec {
        skill: "foo".to_string(),
        source_dir: fixture.root.join("skills/foo"),
        dest_root: fixture.path("dest"),
        placeholder_value: "/opt/skills".to_string(),
        adapter: "claude".to_string(),
        bundle: "default".to_string(),
        source_revision: "unknown".to_string(),
    }
}

#[test]
fn test_fresh_install_resolves_every_placeholder() {
    let mut fixture = E2EFixture::new("fresh_install");

    fixture.log_step("Create canonical skill foo");
    let data = foo_skill(&fixture.root, "__ROOT__");
    fixture.checkpoint("source_ready");

    fixture.log_step("Install into an empty destination");
    let result = install_one(&unit(&fixture), &narrow_policy());
    assert!(result.is_ok(), "install failed: {result:?}");
    fixture.checkpoint("installed");

    fixture.log_step("Check the destination");
    let dest = fixture.path("dest/foo");
    let skill_md = read(&dest.join("SKILL.md"));
    assert_eq!(count(&skill_md, "__ROOT__"), 0);
    assert_eq!(count(&skill_md, "/opt/skills"), 2);
    let run_sh = read(&dest.join("scripts/run.sh"));
    assert_eq!(count(&run_sh, "__ROOT__"), 0);
    assert_eq!(count(&run_sh, "/opt/skills"), 1);
    assert_eq!(fs::read(dest.join("data.bin")).unwrap(), data);
    assert!(dest.join(".skillsync.json").is_file());

    fixture.generate_report();
}

#[test]
fn test_reinstall_keeps_preserved_and_resets_edits() {
    let mut fixture = E2EFixture::new("reinstall");
    foo_skill(&fixture.root, "__ROOT__");
    let canonical_skill_md = read(&fixture.root.join("skills/foo/SKILL.md"))
        .replace("__ROOT__", "/opt/skills");
    let canonical_run_sh = read(&fixture.root.join("skills/foo/scripts/run.sh"))
        .replace("__ROOT__", "/opt/skills");

    fixture.log_step("First install");
    assert!(install_one(&unit(&fixture), &narrow_policy()).is_ok());

    fixture.log_step("Simulate local state and hand edits");
    let dest = fixture.path("dest/foo");
    write_file(&dest.join(".venv/marker.txt"), "venv built here\n");
    write_file(&dest.join("SKILL.md"), "edited by hand\n");
    write_file(&dest.join("scripts/run.sh"), "#!/bin/sh\necho edited\n");
    write_file(&dest.join("stale.md"), "left over from an older version\n");
    fixture.checkpoint("edited");

    fixture.log_step("Reinstall");
    let result = install_one(&unit(&fixture), &narrow_policy());
    let UnitOutcome::Ok { reconcile, .. } = &result.outcome else {
        panic!("reinstall failed: {result:?}");
    };
    assert_eq!(reconcile.preserved, vec![".venv".to_string()]);
    fixture.checkpoint("reinstalled");

    assert_eq!(read(&dest.join(".venv/marker.txt")), "venv built here\n");
    assert_eq!(read(&dest.join("SKILL.md")), canonical_skill_md);
    assert_eq!(read(&dest.join("scripts/run.sh")), canonical_run_sh);
    assert!(!dest.join("stale.md").exists());

    fixture.generate_report();
}

#[test]
fn test_cli_install_and_reinstall_with_env_token() {
    let mut fixture = E2EFixture::new("cli_install");
    foo_skill(&fixture.root, "__ROOT__");
    fixture.bundle("default", &["foo"]);
    let config = fixture.path("skillsync.toml");
    write_file(
        &config,
        "[install]\npreserve = [\".venv\", \"output\"]\nwhitelist = [\"SKILL.md\", \"run.sh\"]\n",
    );
    fixture.set_env("SKILLSYNC_CONFIG", config.display().to_string());
    fixture.set_env("SKILLSYNC_TOKEN", "__ROOT__");
    let dest_root: PathBuf = fixture.path("dest");
    let dest_arg = dest_root.display().to_string();
    let value = dest_arg.clone();

    fixture.log_step("Install the default bundle");
    let output = fixture.run(&["--robot", "install", "--dest", &dest_arg]);
    fixture.assert_success(&output, "install");
    let json = output.json();
    assert_eq!(json["data"]["bundle"], "default");
    assert_eq!(json["data"]["units"][0]["status"], "ok");
    fixture.checkpoint("installed");

    let dest = dest_root.join("foo");
    assert_eq!(count(&read(&dest.join("SKILL.md")), &value), 2);

    fixture.log_step("Edit locally and reinstall");
    write_file(&dest.join(".venv/marker.txt"), "keep");
    write_file(&dest.join("output/result.txt"), "keep too");
    write_file(&dest.join("SKILL.md"), "edited");
    let output = fixture.run(&["install", "--dest", &dest_arg]);
    fixture.assert_success(&output, "reinstall");
    fixture.checkpoint("reinstalled");

    assert_eq!(read(&dest.join(".venv/marker.txt")), "keep");
    assert_eq!(read(&dest.join("output/result.txt")), "keep too");
    assert_eq!(count(&read(&dest.join("SKILL.md")), &value), 2);

    fixture.log_step("Verify the installed tree");
    let output = fixture.run(&["verify", "--dest", &dest_arg]);
    fixture.assert_success(&output, "verify");

    fixture.generate_report();
}

#[test]
fn test_cli_whitelist_violation_blocks_stamp() {
    let mut fixture = E2EFixture::new("whitelist_violation");
    foo_skill(&fixture.root, "__SKILLS_ROOT__");
    fixture.write("skills/foo/setup.py", "ROOT = '__SKILLS_ROOT__'\n");
    let dest_arg = fixture.path("dest").display().to_string();

    fixture.log_step("Install with a token outside the whitelist");
    let output = fixture.run(&["install", "foo", "--dest", &dest_arg]);
    fixture.assert_failure(&output, "install");
    assert!(output.stdout.contains("setup.py"), "stdout: {}", output.stdout);
    assert!(!fixture.path("dest/foo/.skillsync.json").exists());

    fixture.generate_report();
}
