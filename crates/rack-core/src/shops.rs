//! Known shops (`shopstore.yaml` in the resource folder)

use std::path::Path;

use rack_fs::{ConfigStore, ResourceLayout, io};
use rack_remote::{LocalTransport, SshTransport, Timeouts, Transport};
use serde::{Deserialize, Serialize};

use crate::yaml::null_as_default;
use crate::{Error, Result};

/// Addresses that select the local transport.
const LOCAL_ADDRESSES: [&str; 2] = ["localhost", "local"];

/// Connection details of one shop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub address: String,
    pub user: String,
    /// Read from older store files but never used: shops are reached with
    /// the operator's ssh key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(alias = "shopwareDir")]
    pub shopwaredir: String,
    pub container: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Shop {
    /// Read a single shop record from a yaml file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn is_local(&self) -> bool {
        LOCAL_ADDRESSES.contains(&self.address.as_str())
    }

    /// Transport reaching this shop's host.
    pub fn transport(&self, timeouts: Timeouts) -> Box<dyn Transport> {
        if self.is_local() {
            Box::new(LocalTransport::new(timeouts))
        } else {
            if !self.password.is_empty() {
                tracing::debug!(shop = %self.name, "ignoring stored password, ssh authenticates with keys");
            }
            Box::new(
                SshTransport::new(self.address.clone(), self.user.clone())
                    .with_port(self.port)
                    .with_timeouts(timeouts),
            )
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ShopFile {
    #[serde(default, deserialize_with = "null_as_default")]
    shops: Vec<Shop>,
}

/// The shop list, loaded from and saved to the resource folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopStore {
    shops: Vec<Shop>,
}

impl ShopStore {
    pub fn load(layout: &ResourceLayout) -> Result<Self> {
        let file: ShopFile = ConfigStore::new().load_or_default(&layout.shop_store_path())?;
        Ok(Self { shops: file.shops })
    }

    /// Persist the store. An empty store removes the file.
    pub fn save(&self, layout: &ResourceLayout) -> Result<()> {
        let path = layout.shop_store_path();
        if self.shops.is_empty() {
            if io::remove_file_if_exists(&path)? {
                tracing::debug!(path = %path.display(), "removed empty shop store");
            }
            return Ok(());
        }
        let file = ShopFile {
            shops: self.shops.clone(),
        };
        Ok(ConfigStore::new().save(&path, &file)?)
    }

    pub fn add(&mut self, shop: Shop) -> Result<()> {
        if self.get(&shop.name).is_some() {
            return Err(Error::ShopExists { name: shop.name });
        }
        if shop.name.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "shop name must not be empty".into(),
            });
        }
        self.shops.push(shop);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Shop> {
        let index = self
            .shops
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| Error::ShopNotFound { name: name.to_string() })?;
        Ok(self.shops.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Shop> {
        self.shops.iter().find(|s| s.name == name)
    }

    /// Look up a shop, failing with [`Error::ShopNotFound`].
    pub fn require(&self, name: &str) -> Result<&Shop> {
        self.get(name).ok_or_else(|| Error::ShopNotFound { name: name.to_string() })
    }

    pub fn list(&self) -> &[Shop] {
        &self.shops
    }

    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }
}
