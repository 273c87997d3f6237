//! Shared E2E fixture: an isolated canonical root, home and config directory
//! driven through the real binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use serde_json::Value;
use tempfile::TempDir;
use walkdir::WalkDir;

use super::common::{canonical_layout, write_file};

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

pub struct E2EFixture {
    pub name: String,
    pub temp_dir: TempDir,
    pub root: PathBuf,
    env: Vec<(String, String)>,
    steps: Vec<String>,
    checkpoints: Vec<(String, BTreeMap<PathBuf, u64>)>,
}

impl E2EFixture {
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("canon");
        canonical_layout(&root);
        println!("[E2E] {name}: canonical root at {}", root.display());

        Self {
            name: name.to_string(),
            temp_dir,
            root,
            env: Vec::new(),
            steps: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Set an environment variable for every later command.
    pub fn set_env(&mut self, key: &str, value: impl Into<String>) {
        self.env.push((key.to_string(), value.into()));
    }

    pub fn log_step(&mut self, step: &str) {
        println!("[E2E] [{}] step {}: {step}", self.name, self.steps.len() + 1);
        self.steps.push(step.to_string());
    }

    pub fn write(&self, relative_to_root: &str, content: impl AsRef<[u8]>) {
        write_file(&self.root.join(relative_to_root), content);
    }

    pub fn bundle(&self, name: &str, skills: &[&str]) {
        let mut body = format!("name = \"{name}\"\n");
        for skill in skills {
            body.push_str(&format!("\n[[skills]]\nname = \"{skill}\"\n"));
        }
        self.write(&format!("bundles/{name}.toml"), body);
    }

    /// Run the binary from `cwd` without `SKILLSYNC_ROOT`.
    pub fn run_in(&self, cwd: &Path, args: &[&str]) -> CommandOutput {
        self.exec(cwd, args, false)
    }

    /// Run the binary with `SKILLSYNC_ROOT` pointing at the canonical root.
    pub fn run(&self, args: &[&str]) -> CommandOutput {
        self.exec(self.temp_dir.path(), args, true)
    }

    fn exec(&self, cwd: &Path, args: &[&str], with_root: bool) -> CommandOutput {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_skillsync"));
        cmd.args(args)
            .current_dir(cwd)
            .env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env_remove("SKILLSYNC_ROOT")
            .env_remove("SKILLSYNC_CONFIG")
            .env_remove("SKILLSYNC_TOKEN")
            .env_remove("SKILLSYNC_PRESERVE")
            .env_remove("SKILLSYNC_WHITELIST")
            .env_remove("SKILLSYNC_TEXT_EXTENSIONS")
            .env_remove("SKILLSYNC_ROBOT")
            .env_remove("RUST_LOG");
        if with_root {
            cmd.env("SKILLSYNC_ROOT", &self.root);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let output = cmd.output().expect("Failed to run skillsync");
        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        };
        println!(
            "[E2E] skillsync {} -> exit {} in {:?}",
            args.join(" "),
            result.exit_code,
            result.duration
        );
        result
    }

    pub fn assert_success(&self, output: &CommandOutput, what: &str) {
        assert!(
            output.success,
            "{what} failed (exit {})\nstdout: {}\nstderr: {}",
            output.exit_code, output.stdout, output.stderr
        );
    }

    pub fn assert_failure(&self, output: &CommandOutput, what: &str) {
        assert!(
            !output.success,
            "{what} unexpectedly succeeded\nstdout: {}",
            output.stdout
        );
    }

    /// Record the file sizes under the temp dir for the final report.
    pub fn checkpoint(&mut self, label: &str) {
        let mut files = BTreeMap::new();
        for entry in WalkDir::new(self.temp_dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let size = entry.metadata().map(|m| m.len()).unwrap_or_default();
            if let Ok(relative) = entry.path().strip_prefix(self.temp_dir.path()) {
                files.insert(relative.to_path_buf(), size);
            }
        }
        println!("[E2E] checkpoint {label}: {} file(s)", files.len());
        self.checkpoints.push((label.to_string(), files));
    }

    pub fn generate_report(&self) {
        println!("[E2E] ==== {} ====", self.name);
        for (i, step) in self.steps.iter().enumerate() {
            println!("[E2E]   {}. {step}", i + 1);
        }
        for (label, files) in &self.checkpoints {
            println!("[E2E]   checkpoint {label}: {} file(s)", files.len());
        }
    }
}
