//! Reading and writing the state kept on a shop host

use rack_remote::Transport;

use crate::ledger::HashLedger;
use crate::manifest::{DesiredManifest, Rackfile};
use crate::Result;

/// Shop-relative path of the desired-state file.
pub const RACKFILE_PATH: &str = "custom/rackfile.yaml";
/// Shop-relative path of the hash ledger.
pub const LEDGER_PATH: &str = "custom/rackpluginhashes.yaml";
/// Shop-relative directory holding one directory per installed plugin.
pub const PLUGINS_DIR: &str = "custom/plugins";

/// Directory names under the shop's plugin directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    names: Vec<String>,
}

impl InstalledSet {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InstalledSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Join a shop-relative path onto the shopware directory.
pub fn remote_path(shopware_dir: &str, relative: &str) -> String {
    let base = shopware_dir.trim_end_matches('/');
    if base.is_empty() {
        format!("/{relative}")
    } else {
        format!("{base}/{relative}")
    }
}

/// Access to the rackfile, ledger, and plugin directory of one shop.
pub struct StateStore<'a> {
    transport: &'a dyn Transport,
    shopware_dir: &'a str,
}

impl<'a> StateStore<'a> {
    pub fn new(transport: &'a dyn Transport, shopware_dir: &'a str) -> Self {
        Self {
            transport,
            shopware_dir,
        }
    }

    fn path(&self, relative: &str) -> String {
        remote_path(self.shopware_dir, relative)
    }

    /// The shop's rackfile, or an empty one when the shop has none.
    pub fn load_rackfile(&self) -> Result<Rackfile> {
        let path = self.path(RACKFILE_PATH);
        match self.transport.read_file(&path)? {
            Some(bytes) => Rackfile::from_yaml(&path, &String::from_utf8_lossy(&bytes)),
            None => {
                tracing::info!(path = %path, "no rackfile on shop, only mandatory components apply");
                Ok(Rackfile::default())
            }
        }
    }

    pub fn load_manifest(&self, mandatory: &[String]) -> Result<DesiredManifest> {
        Ok(DesiredManifest::from_rackfile(&self.load_rackfile()?, mandatory))
    }

    /// The shop's ledger, or an empty one on first run.
    pub fn load_ledger(&self) -> Result<HashLedger> {
        let path = self.path(LEDGER_PATH);
        match self.transport.read_file(&path)? {
            Some(bytes) => HashLedger::from_yaml(&path, &String::from_utf8_lossy(&bytes)),
            None => {
                tracing::info!(path = %path, "no hash ledger on shop, starting empty");
                Ok(HashLedger::new())
            }
        }
    }

    pub fn save_ledger(&self, ledger: &HashLedger) -> Result<()> {
        let path = self.path(LEDGER_PATH);
        self.transport.write_file(&path, ledger.to_yaml()?.as_bytes())?;
        tracing::info!(path = %path, entries = ledger.len(), "hash ledger saved");
        Ok(())
    }

    pub fn installed(&self) -> Result<InstalledSet> {
        let names = self.transport.list_dirs(&self.path(PLUGINS_DIR))?;
        Ok(InstalledSet::new(names))
    }
}
