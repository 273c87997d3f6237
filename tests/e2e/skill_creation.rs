//! E2E Scenario: Skill Creation
//!
//! new → list → install: a freshly created skill installs cleanly.

use super::common::read;
use super::fixture::E2EFixture;

#[test]
fn test_new_skill_installs_cleanly() {
    let mut fixture = E2EFixture::new("skill_creation");
    let dest = fixture.path("dest");
    let dest_arg = dest.display().to_string();

    fixture.log_step("Create a skill from the built-in template");
    let output = fixture.run(&["new", "pdf-tools", "--description", "Work with PDFs"]);
    fixture.assert_success(&output, "new");
    let skill_md = read(&fixture.root.join("skills/pdf-tools/SKILL.md"));
    assert!(skill_md.contains("name: pdf-tools"));
    assert!(skill_md.contains("Work with PDFs"));
    assert!(skill_md.contains("__SKILLS_ROOT__"));
    fixture.checkpoint("created");

    fixture.log_step("Creating it again needs --force");
    let output = fixture.run(&["new", "pdf-tools"]);
    fixture.assert_failure(&output, "new without --force");
    let output = fixture.run(&["new", "pdf-tools", "--force"]);
    fixture.assert_success(&output, "new --force");

    fixture.log_step("The skill is listed");
    let output = fixture.run(&["--robot", "list"]);
    fixture.assert_success(&output, "list");
    assert_eq!(output.json()["data"]["skills"][0], "pdf-tools");

    fixture.log_step("Install it");
    let output = fixture.run(&["install", "pdf-tools", "--dest", &dest_arg]);
    fixture.assert_success(&output, "install");
    let installed = read(&dest.join("pdf-tools/scripts/run.sh"));
    assert!(installed.contains(&format!("{dest_arg}/pdf-tools")));
    assert!(!installed.contains("__SKILLS_ROOT__"));
    fixture.checkpoint("installed");

    fixture.generate_report();
}

#[test]
fn test_new_from_disk_template() {
    let mut fixture = E2EFixture::new("skill_from_template");
    fixture.write("templates/shell/SKILL.md", "# __SKILL_NAME__\n\n__SKILL_DESCRIPTION__\n");
    fixture.write("templates/shell/run.sh", "#!/bin/sh\necho __SKILL_NAME__\n");

    fixture.log_step("Create from templates/shell");
    let output = fixture.run(&[
        "--robot", "new", "greet", "--template", "shell", "-d", "Say hello",
    ]);
    fixture.assert_success(&output, "new");
    let json = output.json();
    assert_eq!(json["data"]["builtin"], false);
    assert_eq!(json["data"]["files"], 2);
    assert_eq!(
        read(&fixture.root.join("skills/greet/SKILL.md")),
        "# greet\n\nSay hello\n"
    );

    fixture.log_step("Unknown templates are rejected");
    let output = fixture.run(&["new", "other", "--template", "missing"]);
    fixture.assert_failure(&output, "unknown template");

    fixture.generate_report();
}
