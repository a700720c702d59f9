//! Reconciliation planning
//!
//! Compares what a shop has (installed directories and the hash ledger)
//! with what it should have (the desired manifest resolved against the
//! catalog) and decides, per component, what to do. Planning has no side
//! effects on the shop; the only remote access is reading upstream tag
//! hashes through [`Upstream`].

use std::collections::HashSet;

use rack_git::GitClient;

use crate::catalog::SpecCatalog;
use crate::error::ErrorKind;
use crate::ledger::HashLedger;
use crate::manifest::DesiredManifest;
use crate::reference::ComponentReference;
use crate::state::InstalledSet;
use crate::version::{MissingVersionPolicy, VersionResolver};
use crate::Result;

/// The git side of planning.
pub trait Upstream: Send + Sync {
    /// Commit hash the version tag points at in the component's source repository.
    fn latest_hash(&self, source_url: &str, version: &str) -> Result<String>;

    /// URL the shop host should clone from. May carry credentials.
    fn clone_url(&self, source_url: &str) -> String {
        source_url.to_string()
    }
}

impl Upstream for GitClient {
    fn latest_hash(&self, source_url: &str, version: &str) -> Result<String> {
        Ok(self.latest_tag_hash(source_url, version)?)
    }

    fn clone_url(&self, source_url: &str) -> String {
        self.authenticated_url(source_url)
    }
}

/// How the component's code reaches the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    /// Not installed yet: clone the version branch, then check it out.
    Clone,
    /// Already installed: fetch the version tag into the existing clone.
    Fetch,
}

/// Console steps after the checkout, gated by the reference's flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Steps {
    pub install: bool,
    pub activate: bool,
    pub theme: Option<String>,
}

/// Bring one component to a version on the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAction {
    pub name: String,
    pub version: String,
    pub repo: String,
    pub source_url: String,
    pub hash: String,
    pub checkout: CheckoutMode,
    pub steps: Steps,
}

/// What planning decided for one desired component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentOutcome {
    Update(UpdateAction),
    UpToDate { name: String, version: String },
    /// Left alone this run; the reason is logged and reported.
    Skipped { name: String, reason: String },
    /// The catalog does not know the component; the operator may remirror.
    NeedsRemirror { name: String },
}

impl ComponentOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Update(action) => &action.name,
            Self::UpToDate { name, .. } | Self::Skipped { name, .. } | Self::NeedsRemirror { name } => name,
        }
    }
}

/// The result of planning one shop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Installed components no longer desired, sorted.
    pub removals: Vec<String>,
    /// One outcome per desired component, in manifest order.
    pub outcomes: Vec<ComponentOutcome>,
    /// The ledger as it should be persisted after the updates succeed.
    pub ledger: HashLedger,
}

impl Plan {
    pub fn updates(&self) -> impl Iterator<Item = &UpdateAction> {
        self.outcomes.iter().filter_map(|o| match o {
            ComponentOutcome::Update(action) => Some(action),
            _ => None,
        })
    }

    pub fn remirror_candidates(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            ComponentOutcome::NeedsRemirror { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Nothing to remove and nothing to update.
    pub fn is_noop(&self) -> bool {
        self.removals.is_empty() && self.updates().next().is_none()
    }
}

/// Installed names whose bare name is not desired, sorted.
pub fn removal_set(installed: &InstalledSet, desired: &DesiredManifest) -> Vec<String> {
    let wanted = desired.names();
    let mut removals: Vec<String> = installed
        .iter()
        .filter(|name| !name.is_empty() && !wanted.contains(name))
        .map(str::to_string)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    removals.sort();
    removals
}

pub struct Planner<'a> {
    catalog: &'a SpecCatalog,
    resolver: VersionResolver<'a>,
    upstream: &'a dyn Upstream,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a SpecCatalog, policy: MissingVersionPolicy, upstream: &'a dyn Upstream) -> Self {
        Self {
            catalog,
            resolver: VersionResolver::new(catalog, policy),
            upstream,
        }
    }

    /// Plan one shop. `ledger` is consumed and returned updated inside the plan.
    ///
    /// Per-component problems become [`ComponentOutcome::Skipped`]. Errors that
    /// are fatal to the run (authentication, local I/O) are returned.
    pub fn plan(&self, installed: &InstalledSet, desired: &DesiredManifest, mut ledger: HashLedger) -> Result<Plan> {
        let removals = removal_set(installed, desired);
        let mut outcomes = Vec::with_capacity(desired.len());

        for reference in desired.iter() {
            let outcome = self.plan_component(reference, installed, &mut ledger)?;
            outcomes.push(outcome);
        }

        Ok(Plan {
            removals,
            outcomes,
            ledger,
        })
    }

    fn plan_component(
        &self,
        reference: &ComponentReference,
        installed: &InstalledSet,
        ledger: &mut HashLedger,
    ) -> Result<ComponentOutcome> {
        let name = reference.name.as_str();
        let skipped = |reason: String| {
            tracing::warn!(component = %name, "skipping: {reason}");
            ComponentOutcome::Skipped {
                name: name.to_string(),
                reason,
            }
        };

        let Some(owner) = self.catalog.find_repo_for(name)? else {
            tracing::warn!(component = %name, "not found in any mirrored repository");
            return Ok(ComponentOutcome::NeedsRemirror {
                name: name.to_string(),
            });
        };

        let version = match self.resolver.resolve(name, &reference.selector) {
            Ok(version) => version,
            Err(e) if e.kind() == ErrorKind::Inconsistency => return Ok(skipped(e.to_string())),
            Err(e) => return Err(e),
        };

        let repo = self
            .catalog
            .find_repo_with_version(name, &version)?
            .unwrap_or(owner);
        let spec = match self.catalog.load_spec(&repo, name, &version) {
            Ok(Some(spec)) => spec,
            Ok(None) => {
                tracing::warn!(component = %name, version = %version, repo = %repo, "no rackspec for version");
                return Ok(ComponentOutcome::NeedsRemirror {
                    name: name.to_string(),
                });
            }
            Err(e) if matches!(e.kind(), ErrorKind::Inconsistency | ErrorKind::NotFound) => {
                return Ok(skipped(format!("unreadable rackspec: {e}")));
            }
            Err(e) => return Err(e),
        };

        let hash = match self.upstream.latest_hash(spec.source_url(), &version) {
            Ok(hash) => hash,
            Err(e) if e.kind() == ErrorKind::Authentication => return Err(e),
            Err(e) => return Ok(skipped(format!("cannot read upstream hash: {e}"))),
        };

        match ledger.get(name) {
            Some(recorded) if recorded == hash => {
                tracing::info!(component = %name, version = %version, "up to date");
                return Ok(ComponentOutcome::UpToDate {
                    name: name.to_string(),
                    version,
                });
            }
            Some(recorded) => {
                tracing::info!(component = %name, version = %version, old = %recorded, new = %hash, "stale");
            }
            None => {
                tracing::info!(component = %name, version = %version, new = %hash, "no recorded hash");
            }
        }
        ledger.set_or_update(name, &hash);

        let flag = reference.flag;
        let steps = Steps {
            install: flag.installs(),
            activate: flag.activates(),
            theme: if flag.sets_theme() {
                spec.theme().map(str::to_string)
            } else {
                None
            },
        };
        let checkout = if installed.contains(name) {
            CheckoutMode::Fetch
        } else {
            CheckoutMode::Clone
        };

        Ok(ComponentOutcome::Update(UpdateAction {
            name: name.to_string(),
            version,
            repo,
            source_url: spec.source_url().to_string(),
            hash,
            checkout,
            steps,
        }))
    }
}
