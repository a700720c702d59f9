//! Resolving version selectors against the catalog

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::catalog::SpecCatalog;
use crate::reference::VersionSelector;
use crate::{Error, Result};

/// Version assumed by the `baseline` policy when nothing parses.
pub const BASELINE_VERSION: &str = "0.0.1";

/// What `latest` resolves to when no version directory parses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingVersionPolicy {
    /// Fail with [`Error::NoParseableVersion`]; the component is skipped.
    #[default]
    Fail,
    /// Fall back to [`BASELINE_VERSION`].
    Baseline,
}

/// Parse a version directory name.
///
/// Accepts a leading `v` and fills missing minor/patch parts, so `v1.2` is `1.2.0`.
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);
    let parts = core.split('.').count();
    if core.is_empty() || parts > 2 {
        return None;
    }
    let padded = match parts {
        1 => format!("{core}.0.0{suffix}"),
        _ => format!("{core}.0{suffix}"),
    };
    Version::parse(&padded).ok()
}

/// Turns a [`VersionSelector`] into a concrete version directory name.
#[derive(Debug, Clone, Copy)]
pub struct VersionResolver<'a> {
    catalog: &'a SpecCatalog,
    policy: MissingVersionPolicy,
}

impl<'a> VersionResolver<'a> {
    pub fn new(catalog: &'a SpecCatalog, policy: MissingVersionPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Resolve `selector` for `component`.
    ///
    /// Exact selectors are returned unchanged; whether that version exists is
    /// found out when its spec is loaded. `latest` scans every repository and
    /// returns the directory name of the highest parseable version.
    pub fn resolve(&self, component: &str, selector: &VersionSelector) -> Result<String> {
        match selector {
            VersionSelector::Exact(version) => Ok(version.clone()),
            VersionSelector::Latest => self.latest(component),
        }
    }

    fn latest(&self, component: &str) -> Result<String> {
        let mut best: Option<(Version, String)> = None;
        for dir in self.catalog.all_version_dirs(component)? {
            let Some(version) = parse_lenient(&dir) else {
                tracing::debug!(component = %component, dir = %dir, "ignoring unparseable version directory");
                continue;
            };
            if best.as_ref().is_none_or(|(current, _)| version > *current) {
                best = Some((version, dir));
            }
        }

        match (best, self.policy) {
            (Some((_, dir)), _) => Ok(dir),
            (None, MissingVersionPolicy::Baseline) => {
                tracing::warn!(component = %component, "no parseable version, assuming {BASELINE_VERSION}");
                Ok(BASELINE_VERSION.to_string())
            }
            (None, MissingVersionPolicy::Fail) => Err(Error::NoParseableVersion {
                name: component.to_string(),
            }),
        }
    }
}
