//! Per-invocation context
//!
//! Resolves the resource folder once and loads the operator config from it.
//! Commands borrow what they need from here instead of touching process-wide
//! state.

use std::path::PathBuf;
use std::sync::Arc;

use rack_core::{AccountStore, Config, SpecCatalog};
use rack_fs::ResourceLayout;
use rack_git::GitClient;

use crate::error::Result;
use crate::interactive::TerminalCredentials;

/// Resource folder and the config loaded from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub layout: ResourceLayout,
    pub config: Config,
}

impl AppContext {
    /// Use `home` when given, otherwise `$RACKJOBBER_HOME` or the platform data folder.
    pub fn load(home: Option<PathBuf>) -> Result<Self> {
        let layout = match home {
            Some(root) => ResourceLayout::new(root),
            None => ResourceLayout::discover()?,
        };
        let config = Config::load(&layout)?;
        tracing::debug!(root = %layout.root().display(), "resource folder");
        Ok(Self { layout, config })
    }

    /// A git client that uses stored accounts and prompts on the terminal.
    pub fn git_client(&self) -> GitClient {
        let store = AccountStore::new(self.config.clone(), self.layout.config_path())
            .with_prompt(Box::new(TerminalCredentials::new()));
        GitClient::new(Arc::new(store))
    }

    pub fn catalog(&self) -> SpecCatalog {
        SpecCatalog::new(self.layout.repos_dir())
    }
}

/// Directory argument, defaulting to the working directory.
pub fn dir_or_cwd(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_home_wins() {
        let temp = TempDir::new().unwrap();
        let ctx = AppContext::load(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.layout.root(), temp.path());
        assert!(ctx.config.accounts.is_empty());
    }

    #[test]
    fn config_is_read_from_home() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.yaml"), "plugins: [WdyBase]\n").unwrap();

        let ctx = AppContext::load(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.config.plugins, vec!["WdyBase".to_string()]);
    }

    #[test]
    fn explicit_dir_is_kept() {
        let dir = dir_or_cwd(Some(PathBuf::from("/srv/plugin"))).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/plugin"));
    }
}
