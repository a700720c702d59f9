//! On-disk rackspec catalogs.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Render a rackspec document.
pub fn rackspec_yaml(name: &str, version: &str, source: &str, theme: &str) -> String {
    format!(
        "name: {name}\n\
         version: {version}\n\
         description: Test component {name}\n\
         author: Test Author\n\
         compatibility:\n  minVersion: \"5.5\"\n  maxVersion: \"5.6\"\n\
         source:\n  GIT: {source}\n\
         theme: \"{theme}\"\n"
    )
}

/// A resource folder in a temp directory with a `repos/` catalog.
///
/// # Example
///
/// ```rust,no_run
/// use rack_test_utils::catalog::TestCatalog;
///
/// let catalog = TestCatalog::new();
/// catalog.add_spec("master", "Foo", "1.0.0", "https://example.com/foo.git", "");
/// ```
pub struct TestCatalog {
    temp_dir: TempDir,
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCatalog {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
        fs::create_dir_all(temp_dir.path().join("repos"))
            .unwrap_or_else(|e| panic!("failed to create repos dir: {e}"));
        Self { temp_dir }
    }

    /// The resource folder (parent of `repos/`).
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.root().join("repos")
    }

    /// Write `<repo>/<name>/<version>/<name>_rackspec.yaml` and return its path.
    pub fn add_spec(&self, repo: &str, name: &str, version: &str, source: &str, theme: &str) -> PathBuf {
        self.add_raw(
            repo,
            name,
            version,
            &format!("{name}_rackspec.yaml"),
            &rackspec_yaml(name, version, source, theme),
        )
    }

    /// Write an arbitrary file into a version directory.
    pub fn add_raw(&self, repo: &str, name: &str, version_dir: &str, file: &str, contents: &str) -> PathBuf {
        let dir = self.repos_dir().join(repo).join(name).join(version_dir);
        fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("failed to create {}: {e}", dir.display()));
        let path = dir.join(file);
        fs::write(&path, contents).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
        path
    }

    /// Create an empty version directory with no rackspec in it.
    pub fn add_empty_version(&self, repo: &str, name: &str, version_dir: &str) -> PathBuf {
        let dir = self.repos_dir().join(repo).join(name).join(version_dir);
        fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("failed to create {}: {e}", dir.display()));
        dir
    }
}
