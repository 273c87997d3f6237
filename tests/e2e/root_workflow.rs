//! E2E Scenario: Canonical Root Discovery
//!
//! walk up → pointer saved → found via pointer elsewhere → forget → set

use std::fs;

use super::fixture::E2EFixture;

#[test]
fn test_walk_persists_pointer_for_later_runs() {
    let mut fixture = E2EFixture::new("root_walk");
    let pointer = fixture.path("xdg/skillsync/root.txt");
    let elsewhere = fixture.path("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();
    let nested = fixture.root.join("skills");

    fixture.log_step("Resolve by walking up from inside the root");
    let output = fixture.run_in(&nested, &["--robot", "root"]);
    fixture.assert_success(&output, "root from inside");
    let json = output.json();
    assert_eq!(json["data"]["source"], "walk");
    let canonical = fixture.root.canonicalize().unwrap();
    assert_eq!(json["data"]["root"], canonical.display().to_string());
    assert_eq!(
        fs::read_to_string(&pointer).unwrap().trim(),
        canonical.display().to_string()
    );
    fixture.checkpoint("pointer_saved");

    fixture.log_step("Resolve from an unrelated directory via the pointer");
    let output = fixture.run_in(&elsewhere, &["--robot", "root"]);
    fixture.assert_success(&output, "root from elsewhere");
    assert_eq!(output.json()["data"]["source"], "pointer");

    fixture.log_step("Forget the pointer");
    let output = fixture.run_in(&elsewhere, &["--robot", "root", "--forget"]);
    fixture.assert_success(&output, "forget");
    assert_eq!(output.json()["data"]["action"], "forgotten");
    assert!(!pointer.exists());

    fixture.log_step("Nothing resolves any more");
    let output = fixture.run_in(&elsewhere, &["--robot", "list"]);
    fixture.assert_failure(&output, "list without root");
    assert_eq!(
        output.json()["status"]["error"]["code"],
        "root_not_resolved"
    );

    fixture.generate_report();
}

#[test]
fn test_set_validates_before_saving() {
    let mut fixture = E2EFixture::new("root_set");
    let pointer = fixture.path("xdg/skillsync/root.txt");
    let not_a_root = fixture.path("plain");
    fs::create_dir_all(&not_a_root).unwrap();
    let cwd = fixture.temp_dir.path().to_path_buf();

    fixture.log_step("Reject a directory without the required layout");
    let output = fixture.run_in(
        &cwd,
        &["--robot", "root", "--set", &not_a_root.display().to_string()],
    );
    fixture.assert_failure(&output, "set invalid");
    assert!(!pointer.exists());

    fixture.log_step("Accept the canonical root");
    let output = fixture.run_in(
        &cwd,
        &["--robot", "root", "--set", &fixture.root.display().to_string()],
    );
    fixture.assert_success(&output, "set valid");
    assert_eq!(output.json()["data"]["action"], "saved");
    assert!(pointer.is_file());

    fixture.generate_report();
}

#[test]
fn test_env_root_is_not_persisted() {
    let mut fixture = E2EFixture::new("root_env");

    fixture.log_step("Resolve through SKILLSYNC_ROOT");
    let output = fixture.run(&["--robot", "root"]);
    fixture.assert_success(&output, "root via env");
    assert_eq!(output.json()["data"]["source"], "env");
    assert!(!fixture.path("xdg/skillsync/root.txt").exists());

    fixture.generate_report();
}
