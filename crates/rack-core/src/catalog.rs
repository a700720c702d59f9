//! The local catalog of mirrored rackspec repositories
//!
//! Layout: `repos/<repo>/<component>/<version>/<name>_rackspec.yaml`.
//! Repositories are searched in sorted order and the first repository that
//! has a directory for a component owns it. A component name appearing in
//! two repositories with different content is an operator error that is not
//! detected here.

use std::path::{Path, PathBuf};

use crate::spec::{ComponentSpec, find_spec_file};
use crate::Result;

#[derive(Debug, Clone)]
pub struct SpecCatalog {
    repos_dir: PathBuf,
}

impl SpecCatalog {
    pub fn new(repos_dir: impl Into<PathBuf>) -> Self {
        Self {
            repos_dir: repos_dir.into(),
        }
    }

    pub fn repos_dir(&self) -> &Path {
        &self.repos_dir
    }

    /// Mirrored repository names, sorted. A missing `repos/` directory is an empty catalog.
    pub fn repos(&self) -> Result<Vec<String>> {
        if !rack_fs::io::exists(&self.repos_dir)? {
            return Ok(Vec::new());
        }
        Ok(rack_fs::io::list_subdirs(&self.repos_dir)?)
    }

    /// The first repository that contains `component`.
    pub fn find_repo_for(&self, component: &str) -> Result<Option<String>> {
        for repo in self.repos()? {
            if self.component_dir(&repo, component).is_dir() {
                return Ok(Some(repo));
            }
        }
        Ok(None)
    }

    /// The first repository that has a `version` directory for `component`.
    ///
    /// `latest` is resolved across every repository, so the version may live
    /// in a later repository than the one [`find_repo_for`](Self::find_repo_for) picks.
    pub fn find_repo_with_version(&self, component: &str, version: &str) -> Result<Option<String>> {
        for repo in self.repos()? {
            if self.component_dir(&repo, component).join(version).is_dir() {
                return Ok(Some(repo));
            }
        }
        Ok(None)
    }

    /// Version directory names of `component` in `repo`, sorted by name.
    pub fn version_dirs(&self, repo: &str, component: &str) -> Result<Vec<String>> {
        let dir = self.component_dir(repo, component);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        Ok(rack_fs::io::list_subdirs(&dir)?)
    }

    /// Version directory names of `component` across every repository, in repository order.
    pub fn all_version_dirs(&self, component: &str) -> Result<Vec<String>> {
        let mut versions = Vec::new();
        for repo in self.repos()? {
            versions.extend(self.version_dirs(&repo, component)?);
        }
        Ok(versions)
    }

    /// Component names in one repository, or in all of them when `repo` is `None`.
    pub fn component_names(&self, repo: Option<&str>) -> Result<Vec<String>> {
        let repos = match repo {
            Some(r) => vec![r.to_string()],
            None => self.repos()?,
        };
        let mut names = Vec::new();
        for repo in repos {
            let dir = self.repos_dir.join(&repo);
            if dir.is_dir() {
                names.extend(rack_fs::io::list_subdirs(&dir)?);
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Load the spec for `component` at `version` from `repo`. `None` when absent.
    pub fn load_spec(&self, repo: &str, component: &str, version: &str) -> Result<Option<ComponentSpec>> {
        let dir = self.component_dir(repo, component).join(version);
        if !dir.is_dir() {
            return Ok(None);
        }
        match find_spec_file(&dir)? {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading rackspec");
                ComponentSpec::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    fn component_dir(&self, repo: &str, component: &str) -> PathBuf {
        self.repos_dir.join(repo).join(component)
    }
}
