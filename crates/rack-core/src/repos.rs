//! Catalog mirror management
//!
//! Every catalog is a git clone under `repos/<name>`. The master catalog
//! lives in `repos/master` and is cloned by `setup`.

use std::collections::BTreeMap;
use std::path::Path;

use rack_fs::{ResourceLayout, io};
use rack_git::{GitClient, MirrorStatus, publish};

use crate::orchestrator::CatalogMirror;
use crate::plugin::PluginXml;
use crate::spec::{ComponentSpec, find_spec_file};
use crate::{Error, ErrorKind, Result};

/// Upstream of the master catalog.
pub const MASTER_URL: &str = "https://github.com/worldiety/Rackspecs.git";
/// Directory name of the master catalog.
pub const MASTER_REPO: &str = "master";

/// Clones, updates, and publishes to the catalog mirrors.
pub struct RepoManager<'a> {
    layout: &'a ResourceLayout,
    git: &'a GitClient,
    master_url: String,
}

impl<'a> RepoManager<'a> {
    pub fn new(layout: &'a ResourceLayout, git: &'a GitClient) -> Self {
        Self {
            layout,
            git,
            master_url: MASTER_URL.to_string(),
        }
    }

    /// Use a different upstream for the master catalog.
    pub fn with_master_url(mut self, url: impl Into<String>) -> Self {
        self.master_url = url.into();
        self
    }

    /// Create the resource folder and mirror the master catalog.
    pub fn setup(&self) -> Result<MirrorStatus> {
        self.layout.ensure()?;
        let status = self.git.mirror(&self.master_url, &self.layout.master_repo_dir())?;
        tracing::info!(status = ?status, "master catalog ready");
        Ok(status)
    }

    /// Delete the master mirror and clone it again.
    pub fn reinstall_master(&self) -> Result<()> {
        let dir = self.layout.master_repo_dir();
        io::remove_dir_all(&dir)?;
        self.layout.ensure()?;
        self.git.clone_repo(&self.master_url, &dir)?;
        tracing::info!("master catalog reinstalled");
        Ok(())
    }

    pub fn add(&self, name: &str, url: &str) -> Result<()> {
        validate_repo_name(name)?;
        let dir = self.layout.repo_dir(name);
        if io::exists(&dir)? {
            return Err(Error::RepoExists { name: name.to_string() });
        }
        self.layout.ensure()?;
        self.git.clone_repo(url, &dir)?;
        tracing::info!(repo = %name, "added catalog");
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let dir = self.existing_repo_dir(name)?;
        io::remove_dir_all(&dir)?;
        tracing::info!(repo = %name, "removed catalog");
        Ok(())
    }

    /// Mirror names mapped to their origin URLs, sorted by name.
    pub fn list(&self) -> Result<BTreeMap<String, String>> {
        let mut repos = BTreeMap::new();
        for name in self.names()? {
            let url = match self.git.remote_url(&self.layout.repo_dir(&name)) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(repo = %name, error = %e, "could not read origin");
                    String::new()
                }
            };
            repos.insert(name, url);
        }
        Ok(repos)
    }

    /// Fetch and fast-forward every mirror, reporting each result.
    pub fn update_all(&self) -> Result<Vec<(String, rack_git::Result<MirrorStatus>)>> {
        let mut results = Vec::new();
        for name in self.names()? {
            let status = self.git.update(&self.layout.repo_dir(&name));
            match &status {
                Ok(s) => tracing::debug!(repo = %name, status = ?s, "updated catalog"),
                Err(e) => tracing::warn!(repo = %name, error = %e, "catalog update failed"),
            }
            results.push((name, status));
        }
        Ok(results)
    }

    /// Publish the rackspec in `plugin_dir` to catalog `repo`.
    ///
    /// The spec's version must be tagged upstream and must match the
    /// version in `plugin.xml`. A failed commit or push leaves the mirror as
    /// it was.
    pub fn push_spec(&self, repo: &str, plugin_dir: &Path) -> Result<ComponentSpec> {
        let repo_dir = self.existing_repo_dir(repo)?;
        self.git.update(&repo_dir)?;

        let spec_path = find_spec_file(plugin_dir)?.ok_or_else(|| Error::RackspecNotFound {
            dir: plugin_dir.to_path_buf(),
        })?;
        let spec = ComponentSpec::load(&spec_path)?;

        self.git
            .latest_tag_hash(spec.source_url(), &spec.version)
            .map_err(|e| match e {
                rack_git::Error::TagNotFound { .. } => Error::MissingTag {
                    name: spec.name.clone(),
                    version: spec.version.clone(),
                },
                other => other.into(),
            })?;

        let plugin_xml = PluginXml::read(plugin_dir)?;
        if plugin_xml.version != spec.version {
            return Err(Error::VersionMismatch {
                spec: spec.version.clone(),
                plugin_xml: plugin_xml.version,
            });
        }

        let version_dir = repo_dir.join(&spec.name).join(&spec.version);
        let target = version_dir.join(spec.file_name());
        if io::exists(&target)? {
            return Err(Error::AlreadyExists { path: target });
        }

        let head = publish::head_commit(&repo_dir)?;
        io::mkdir_if_absent(&version_dir)?;
        io::copy_file(&spec_path, &target)?;

        let message = format!(
            "Add {} for Version {} to repo",
            spec.file_name(),
            spec.version
        );
        let pathspec = format!("{}/{}", spec.name, spec.version);
        let published = publish::commit_all(&repo_dir, &pathspec, &message)
            .map_err(Error::from)
            .and_then(|_| self.git.push(&repo_dir).map_err(Error::from));

        if let Err(e) = published {
            tracing::warn!(repo = %repo, error = %e, "publishing failed, rolling back");
            if let Some(head) = head {
                if let Err(reset) = publish::reset_hard(&repo_dir, head) {
                    tracing::warn!(error = %reset, "could not reset catalog mirror");
                }
            }
            io::remove_dir_all(&version_dir)?;
            return Err(e);
        }

        tracing::info!(repo = %repo, plugin = %spec.name, version = %spec.version, "published rackspec");
        Ok(spec)
    }

    fn names(&self) -> Result<Vec<String>> {
        let dir = self.layout.repos_dir();
        if !io::exists(&dir)? {
            return Ok(Vec::new());
        }
        Ok(io::list_subdirs(&dir)?)
    }

    fn existing_repo_dir(&self, name: &str) -> Result<std::path::PathBuf> {
        let dir = self.layout.repo_dir(name);
        if !name.is_empty() && dir.is_dir() {
            Ok(dir)
        } else {
            Err(Error::RepoNotFound { name: name.to_string() })
        }
    }
}

impl CatalogMirror for RepoManager<'_> {
    /// Update every mirror. An authentication failure is returned; other
    /// failures were already logged by [`RepoManager::update_all`].
    fn refresh(&self) -> Result<()> {
        for (_, status) in self.update_all()? {
            if let Err(e) = status {
                let e = Error::from(e);
                if e.kind() == ErrorKind::Authentication {
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn remirror(&self) -> Result<()> {
        self.reinstall_master()
    }
}

fn validate_repo_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput {
            message: format!("'{name}' is not a valid repository name"),
        })
    }
}
