use std::path::PathBuf;

use tempfile::TempDir;

use crate::core::root::REQUIRED_DIRS;

/// Test fixture providing an isolated canonical tree on disk.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create `skills/<name>/SKILL.md`.
    #[must_use]
    pub fn create_skill(&self, name: &str, content: &str) -> PathBuf {
        self.create_file(&format!("skills/{name}/SKILL.md"), content)
    }

    /// Create the directories a canonical root must contain.
    pub fn create_canonical_layout(&self) {
        for dir in REQUIRED_DIRS {
            std::fs::create_dir_all(self.data_path.join(dir)).expect("Failed to create layout");
        }
    }

    /// Create `adapters/<name>/adapter.toml` pointing at `dest`.
    #[must_use]
    pub fn create_adapter(&self, name: &str, dest: &str) -> PathBuf {
        let dest = dest.replace('\\', "\\\\");
        self.create_file(
            &format!("adapters/{name}/adapter.toml"),
            &format!("dest = \"{dest}\"\n"),
        )
    }

    /// Create `bundles/<name>.toml` listing `skills` in order.
    #[must_use]
    pub fn create_bundle(&self, name: &str, skills: &[&str]) -> PathBuf {
        let mut body = format!("name = \"{name}\"\n");
        for skill in skills {
            body.push_str(&format!("\n[[skills]]\nname = \"{skill}\"\n"));
        }
        self.create_file(&format!("bundles/{name}.toml"), &body)
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
