//! Component specifications (rackspec files)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::yaml::scalar_string;
use crate::{Error, Result};

/// Shopware versions a component supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    #[serde(rename = "minVersion", alias = "minversion", default, deserialize_with = "scalar_string")]
    pub min_version: String,
    #[serde(rename = "maxVersion", alias = "maxversion", default, deserialize_with = "scalar_string")]
    pub max_version: String,
}

/// Where the component's code lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "GIT", alias = "git", default)]
    pub git: String,
}

/// One `<name>_rackspec.yaml` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub compatibility: Compatibility,
    #[serde(default)]
    pub source: Source,
    #[serde(default, deserialize_with = "scalar_string")]
    pub theme: String,
}

impl ComponentSpec {
    /// The theme to select after activation, if the spec declares one.
    pub fn theme(&self) -> Option<&str> {
        let theme = self.theme.trim();
        (!theme.is_empty()).then_some(theme)
    }

    pub fn source_url(&self) -> &str {
        &self.source.git
    }

    /// File name the spec is stored under in a catalog.
    pub fn file_name(&self) -> String {
        format!("{}_rackspec.yaml", self.name)
    }

    pub fn from_yaml(path: &Path, text: &str) -> Result<Self> {
        let spec: Self = serde_yaml::from_str(text).map_err(|e| Error::InvalidSpec {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if spec.name.trim().is_empty() {
            return Err(Error::InvalidSpec {
                path: path.to_path_buf(),
                message: "name must not be empty".to_string(),
            });
        }
        Ok(spec)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = rack_fs::io::read_text(path)?;
        Self::from_yaml(path, &text)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Whether a file name looks like a rackspec.
pub fn is_rackspec_file(name: &str) -> bool {
    name.contains("rackspec") && (name.ends_with(".yaml") || name.ends_with(".yml"))
}

/// First rackspec file in `dir` by name, if any.
pub fn find_spec_file(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| rack_fs::Error::io(dir, e))?;
    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| rack_fs::Error::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_rackspec_file(&name) && entry.path().is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}
