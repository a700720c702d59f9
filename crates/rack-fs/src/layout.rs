//! Resource folder layout
//!
//! All local state lives under a single folder:
//!
//! ```text
//! <root>/
//!   config.yaml       operator configuration
//!   shopstore.yaml    known shops
//!   repos/
//!     master/         master catalog mirror
//!     <name>/         additional catalog mirrors
//! ```

use std::path::{Path, PathBuf};

use crate::{Error, ResourcePath, Result, io};

/// Environment variable overriding the resource folder location.
pub const HOME_ENV: &str = "RACKJOBBER_HOME";

/// Resolved locations inside the resource folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLayout {
    root: PathBuf,
}

impl ResourceLayout {
    /// Use an explicit root folder.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the resource folder: `$RACKJOBBER_HOME` if set, otherwise
    /// `<platform data dir>/rackjobber`.
    pub fn discover() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(home));
        }
        let data_dir = dirs::data_dir().ok_or(Error::NoResourceFolder)?;
        Ok(Self::new(data_dir.join("rackjobber")))
    }

    /// Create the root and `repos/` directories if missing.
    pub fn ensure(&self) -> Result<()> {
        if io::mkdir_if_absent(&self.repos_dir())? {
            tracing::debug!(root = %self.root.display(), "created resource folder");
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.root.join(ResourcePath::Repos)
    }

    pub fn repo_dir(&self, name: &str) -> PathBuf {
        self.repos_dir().join(name)
    }

    pub fn master_repo_dir(&self) -> PathBuf {
        self.repos_dir().join(ResourcePath::MasterRepo)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(ResourcePath::Config)
    }

    pub fn shop_store_path(&self) -> PathBuf {
        self.root.join(ResourcePath::ShopStore)
    }
}
