//! [`TestProject`] for tests that read configs from disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory holding pipeline configs.
///
/// # Example
///
/// ```rust,no_run
/// use skiff_test_utils::{TestProject, fixtures};
///
/// let project = TestProject::new();
/// let path = project.write("skiff.yaml", fixtures::V1);
/// project.assert_file_contains("skiff.yaml", "apiVersion");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the main config as `skiff.yaml` and return its path as a
    /// source string.
    pub fn write_config(&self, content: &str) -> String {
        self.write("skiff.yaml", content).to_string_lossy().into_owned()
    }

    /// Write a profile sidecar next to `skiff.yaml`.
    pub fn write_sidecar(&self, profile: &str, extension: &str, content: &str) -> PathBuf {
        self.write(&format!("skiff_{profile}.{extension}"), content)
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            relative,
            content,
            file_content
        );
    }
}
