//! Operator configuration (`config.yaml` in the resource folder)
//!
//! Loaded once per process and passed down explicitly. Holds the git
//! accounts used for private upstreams, the mandatory plugins every shop
//! receives, and the planning and timeout knobs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rack_fs::{ConfigStore, ResourceLayout};
use rack_git::{CredentialSource, Credentials};
use rack_remote::Timeouts;
use serde::{Deserialize, Serialize};

use crate::orchestrator::SyncSettings;
use crate::version::MissingVersionPolicy;
use crate::yaml::{null_as_default, scalar_list};
use crate::{Error, Result};

/// Credentials for one git host.
///
/// The password is stored hex-encoded. This keeps it out of casual view
/// and is not encryption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitAccount {
    pub domain: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    password: String,
    #[serde(default)]
    pub inkeychain: bool,
}

impl GitAccount {
    /// Build an account from a plain-text password.
    pub fn new(domain: impl Into<String>, username: impl Into<String>, password: &str) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: hex::encode(password),
            inkeychain: false,
        }
    }

    /// An account whose password lives in the platform keychain.
    ///
    /// Keychain lookups are not supported, so these accounts always prompt.
    pub fn keychain(domain: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: String::new(),
            inkeychain: true,
        }
    }

    /// Decoded password, `None` for keychain accounts or undecodable values.
    pub fn password(&self) -> Option<String> {
        if self.inkeychain || self.password.is_empty() {
            return None;
        }
        match hex::decode(&self.password).map(String::from_utf8) {
            Ok(Ok(password)) => Some(password),
            _ => {
                tracing::warn!(domain = %self.domain, "stored password is not valid hex, ignoring it");
                None
            }
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.password()
            .map(|password| Credentials::new(self.username.clone(), password))
    }
}

fn default_command_secs() -> u64 {
    600
}

fn default_connect_secs() -> u64 {
    15
}

/// Remote timeouts in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutSettings {
    #[serde(default = "default_command_secs")]
    pub command_secs: u64,
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            command_secs: default_command_secs(),
            connect_secs: default_connect_secs(),
        }
    }
}

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(rename = "GIT", alias = "git", default, deserialize_with = "null_as_default")]
    pub accounts: Vec<GitAccount>,

    /// Mandatory component tokens appended to every shop's rackfile.
    #[serde(default, deserialize_with = "scalar_list")]
    pub plugins: Vec<String>,

    #[serde(default)]
    pub missing_version: MissingVersionPolicy,

    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

impl Config {
    /// Load from the resource folder. A missing file gives the defaults.
    pub fn load(layout: &ResourceLayout) -> Result<Self> {
        Self::load_from(&layout.config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    pub fn save(&self, layout: &ResourceLayout) -> Result<()> {
        self.save_to(&layout.config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    pub fn account(&self, domain: &str) -> Option<&GitAccount> {
        self.accounts.iter().find(|a| a.domain == domain)
    }

    /// Insert or replace the account for its domain, returning the previous one.
    pub fn set_account(&mut self, account: GitAccount) -> Option<GitAccount> {
        match self.accounts.iter_mut().find(|a| a.domain == account.domain) {
            Some(existing) => Some(std::mem::replace(existing, account)),
            None => {
                self.accounts.push(account);
                None
            }
        }
    }

    pub fn remove_account(&mut self, domain: &str) -> Result<GitAccount> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.domain == domain)
            .ok_or_else(|| Error::AccountNotFound {
                domain: domain.to_string(),
            })?;
        Ok(self.accounts.remove(index))
    }

    pub fn remote_timeouts(&self) -> Timeouts {
        Timeouts::from_secs(self.timeouts.command_secs, self.timeouts.connect_secs)
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            mandatory: self.plugins.clone(),
            missing_version: self.missing_version,
        }
    }
}

/// Asks the operator for credentials when a remote rejects anonymous access.
pub trait CredentialPrompt: Send + Sync {
    fn ask(&self, domain: &str) -> Option<Credentials>;
}

/// Git credentials backed by the operator config.
///
/// Prompted credentials that the remote accepted are written back to the
/// config file.
pub struct AccountStore {
    config: Mutex<Config>,
    path: PathBuf,
    prompt: Option<Box<dyn CredentialPrompt>>,
}

impl AccountStore {
    pub fn new(config: Config, path: impl Into<PathBuf>) -> Self {
        Self {
            config: Mutex::new(config),
            path: path.into(),
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: Box<dyn CredentialPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Snapshot of the current config, including remembered accounts.
    pub fn config(&self) -> Config {
        match self.config.lock() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CredentialSource for AccountStore {
    fn stored(&self, domain: &str) -> Option<Credentials> {
        let config = self.config.lock().ok()?;
        config.account(domain).and_then(GitAccount::credentials)
    }

    fn prompt(&self, domain: &str) -> Option<Credentials> {
        self.prompt.as_ref()?.ask(domain)
    }

    fn remember(&self, domain: &str, credentials: &Credentials) {
        let Ok(mut config) = self.config.lock() else {
            return;
        };
        config.set_account(GitAccount::new(
            domain,
            credentials.username.clone(),
            &credentials.password,
        ));
        match config.save_to(&self.path) {
            Ok(()) => tracing::info!(domain, "saved git account"),
            Err(e) => tracing::warn!(domain, error = %e, "could not save git account"),
        }
    }
}
