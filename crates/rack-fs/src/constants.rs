//! Well-known entries of the resource folder.

use std::path::Path;

/// Fixed names inside the rackjobber resource folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePath {
    /// The `repos` directory holding one catalog mirror per subdirectory
    Repos,
    /// The master catalog mirror inside `repos`
    MasterRepo,
    /// Operator configuration (git accounts, mandatory plugins)
    Config,
    /// Known shops
    ShopStore,
}

impl ResourcePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repos => "repos",
            Self::MasterRepo => "master",
            Self::Config => "config.yaml",
            Self::ShopStore => "shopstore.yaml",
        }
    }
}

impl AsRef<Path> for ResourcePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
