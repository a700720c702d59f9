//! The hash ledger kept on each shop
//!
//! Maps component names to the upstream commit hash that was last deployed.
//! Stored at `custom/rackpluginhashes.yaml` as `hashes: [{name, hash}]`.
//! Entries are never removed; a stale entry for a deleted component is
//! ignored because lookups only happen for desired components.

use serde::{Deserialize, Serialize};

use crate::yaml::{from_str_or_default, null_as_default};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    pub name: String,
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashLedger {
    #[serde(default, deserialize_with = "null_as_default")]
    hashes: Vec<HashEntry>,
}

impl HashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last deployed hash for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.hashes
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.hash.as_str())
    }

    /// Record `hash` for `name`, keeping the position of an existing entry.
    pub fn set_or_update(&mut self, name: &str, hash: &str) {
        match self.hashes.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.hash = hash.to_string(),
            None => self.hashes.push(HashEntry {
                name: name.to_string(),
                hash: hash.to_string(),
            }),
        }
    }

    pub fn entries(&self) -> &[HashEntry] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Parse the remote file. `origin` names the file in errors.
    pub fn from_yaml(origin: &str, text: &str) -> Result<Self> {
        from_str_or_default(text).map_err(|e| Error::MalformedRemoteFile {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for HashLedger {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (name, hash) in iter {
            ledger.set_or_update(name, hash);
        }
        ledger
    }
}
