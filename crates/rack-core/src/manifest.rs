//! The desired state of a shop
//!
//! The shop's own `custom/rackfile.yaml` lists plugins and themes. The
//! operator's mandatory components are appended when the rackfile does not
//! already name them. The first reference to a name wins.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::reference::ComponentReference;
use crate::yaml::{from_str_or_default, scalar_list};
use crate::{Error, Result};

/// Contents of `custom/rackfile.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rackfile {
    #[serde(rename = "Plugins", alias = "plugins", default, deserialize_with = "scalar_list")]
    pub plugins: Vec<String>,
    #[serde(rename = "Themes", alias = "themes", default, deserialize_with = "scalar_list")]
    pub themes: Vec<String>,
}

impl Rackfile {
    pub fn from_yaml(origin: &str, text: &str) -> Result<Self> {
        from_str_or_default(text).map_err(|e| Error::MalformedRemoteFile {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// A starter rackfile showing the accepted token forms.
    pub fn example() -> Self {
        Self {
            plugins: vec![
                "PluginExample".into(),
                "PluginLatestExample:latest".into(),
                "PluginVersionExample:1.0.0".into(),
                "PluginNoActivateExample:1.0.0:noactivate".into(),
            ],
            themes: vec![
                "ThemeExample".into(),
                "ThemeLatestExample:latest".into(),
                "ThemeVersionExample:1.0.0".into(),
            ],
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Ordered, duplicate-free list of wanted components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredManifest {
    references: Vec<ComponentReference>,
}

impl DesiredManifest {
    /// Plugins, then themes, then mandatory components not named yet.
    ///
    /// Tokens that do not parse are logged and left out.
    pub fn from_rackfile(rackfile: &Rackfile, mandatory: &[String]) -> Self {
        let tokens = rackfile
            .plugins
            .iter()
            .chain(&rackfile.themes)
            .chain(mandatory);

        let mut manifest = Self::default();
        for token in tokens {
            match ComponentReference::parse(token) {
                Ok(reference) => {
                    manifest.push(reference);
                }
                Err(e) => tracing::warn!(error = %e, "ignoring manifest entry"),
            }
        }
        manifest
    }

    /// Append `reference` unless a reference with the same name is present.
    pub fn push(&mut self, reference: ComponentReference) -> bool {
        if self.contains(&reference.name) {
            tracing::debug!(component = %reference.name, "duplicate manifest entry, keeping the first");
            return false;
        }
        self.references.push(reference);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.references.iter().any(|r| r.name == name)
    }

    /// Bare names, without version or flag.
    pub fn names(&self) -> HashSet<&str> {
        self.references.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentReference> {
        self.references.iter()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl FromIterator<ComponentReference> for DesiredManifest {
    fn from_iter<I: IntoIterator<Item = ComponentReference>>(iter: I) -> Self {
        let mut manifest = Self::default();
        for reference in iter {
            manifest.push(reference);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Flag, VersionSelector};
    use pretty_assertions::assert_eq;

    fn names(manifest: &DesiredManifest) -> Vec<String> {
        manifest.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn plugins_then_themes_then_mandatory() {
        let rackfile = Rackfile {
            plugins: vec!["Foo:1.0.0".into(), "Bar".into()],
            themes: vec!["Skin:latest:nosettheme".into()],
        };
        let manifest = DesiredManifest::from_rackfile(&rackfile, &["Base".into(), "Foo:2.0.0".into()]);

        assert_eq!(
            names(&manifest),
            vec!["Foo:1.0.0", "Bar", "Skin:latest:nosettheme", "Base"]
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let rackfile = Rackfile {
            plugins: vec!["Foo:1.0.0".into(), "Foo:2.0.0:noinstall".into()],
            themes: vec![],
        };
        let manifest = DesiredManifest::from_rackfile(&rackfile, &[]);
        assert_eq!(manifest.len(), 1);
        let first = manifest.iter().next().unwrap();
        assert_eq!(first.selector, VersionSelector::Exact("1.0.0".into()));
        assert_eq!(first.flag, Flag::None);
    }

    #[test]
    fn empty_rackfile_still_gets_mandatory_components() {
        let manifest = DesiredManifest::from_rackfile(&Rackfile::default(), &["Base".into()]);
        assert_eq!(names(&manifest), vec!["Base"]);
    }

    #[test]
    fn invalid_tokens_are_dropped() {
        let rackfile = Rackfile {
            plugins: vec!["Foo:1:bogus".into(), "Bar".into()],
            themes: vec![],
        };
        assert_eq!(names(&DesiredManifest::from_rackfile(&rackfile, &[])), vec!["Bar"]);
    }

    #[test]
    fn rackfile_accepts_both_key_spellings() {
        let upper = Rackfile::from_yaml("r", "Plugins:\n- Foo\nThemes:\n- Skin\n").unwrap();
        let lower = Rackfile::from_yaml("r", "plugins: [Foo]\nthemes: [Skin]\n").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(Rackfile::from_yaml("r", "Plugins:\n").unwrap(), Rackfile::default());
    }

    #[test]
    fn malformed_rackfile_is_an_error() {
        assert!(matches!(
            Rackfile::from_yaml("custom/rackfile.yaml", "Plugins: {a: [}"),
            Err(Error::MalformedRemoteFile { .. })
        ));
    }
}
