//! Driving one sync run against a shop
//!
//! Order of a run:
//! 1. refresh the catalog mirrors,
//! 2. load the desired manifest and hash ledger from the shop,
//! 3. list the installed plugins,
//! 4. plan,
//! 5. offer a remirror for components the catalog does not know,
//! 6. delete unwanted plugins, initialise the theme, update stale
//!    components, clear the cache,
//! 7. write the ledger back once.
//!
//! Any actuation failure aborts the run before the ledger is written, so
//! the next run re-plans from the last persisted ledger.

use rack_remote::Transport;

use crate::actuate::{RemoteActuator, ShopCommands};
use crate::catalog::SpecCatalog;
use crate::error::ErrorKind;
use crate::plan::{ComponentOutcome, Plan, Planner, Upstream};
use crate::state::StateStore;
use crate::version::MissingVersionPolicy;
use crate::Result;

/// Keeps the local catalog in step with its upstreams.
pub trait CatalogMirror: Send + Sync {
    /// Fetch and fast-forward every mirror. Already up to date is success.
    fn refresh(&self) -> Result<()>;

    /// Throw away the master mirror and clone it again.
    fn remirror(&self) -> Result<()>;
}

/// Yes/no questions to the operator.
pub trait Prompt: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// A prompt that always answers the same, for unattended runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!(answer = self.0, "{question}");
        self.0
    }
}

/// Operator settings that shape planning.
#[derive(Debug, Clone, Default)]
pub struct SyncSettings {
    /// Components every shop gets, appended to its rackfile.
    pub mandatory: Vec<String>,
    pub missing_version: MissingVersionPolicy,
}

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Plan and report without touching the shop or writing the ledger.
    pub dry_run: bool,
    /// Return [`SyncOutcome::RestartRequired`] on an accepted remirror but
    /// leave the mirror alone. Set when other shops read the catalog
    /// concurrently; the caller remirrors once they are done.
    pub defer_remirror: bool,
}

/// The shop a run acts on.
#[derive(Clone, Copy)]
pub struct ShopTarget<'a> {
    pub name: &'a str,
    pub transport: &'a dyn Transport,
    pub shopware_dir: &'a str,
    pub container: &'a str,
}

/// A component that was left alone, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedComponent {
    pub name: String,
    pub reason: String,
}

/// Report from a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub shop: String,
    pub dry_run: bool,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub up_to_date: Vec<String>,
    pub skipped: Vec<SkippedComponent>,
    /// Human-readable actions, in execution order.
    pub actions: Vec<String>,
    pub ledger_saved: bool,
}

impl SyncReport {
    fn new(shop: &str, dry_run: bool) -> Self {
        Self {
            shop: shop.to_string(),
            dry_run,
            ..Default::default()
        }
    }

    fn action(&mut self, action: String) {
        let action = if self.dry_run {
            format!("[dry-run] Would {action}")
        } else {
            action
        };
        self.actions.push(action);
    }

    /// Nothing was removed or updated.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty()
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// The operator accepted a remirror for `component`; run again to pick it up.
    RestartRequired { component: String },
}

pub struct SyncOrchestrator<'a> {
    catalog: &'a SpecCatalog,
    mirror: &'a dyn CatalogMirror,
    upstream: &'a dyn Upstream,
    prompt: &'a dyn Prompt,
    settings: SyncSettings,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        catalog: &'a SpecCatalog,
        mirror: &'a dyn CatalogMirror,
        upstream: &'a dyn Upstream,
        prompt: &'a dyn Prompt,
        settings: SyncSettings,
    ) -> Self {
        Self {
            catalog,
            mirror,
            upstream,
            prompt,
            settings,
        }
    }

    /// Refresh the catalog, then sync `target`.
    pub fn run(&self, target: ShopTarget<'_>, options: &SyncOptions) -> Result<SyncOutcome> {
        self.refresh_catalog()?;
        self.sync_shop(target, options)
    }

    /// Refresh every mirror. Only authentication failures stop the run;
    /// anything else leaves the existing mirror in use.
    pub fn refresh_catalog(&self) -> Result<()> {
        match self.mirror.refresh() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::Authentication => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "catalog refresh failed, continuing with existing mirror");
                Ok(())
            }
        }
    }

    /// Throw away the master mirror and clone it again.
    pub fn remirror(&self) -> Result<()> {
        tracing::info!("remirroring master repository");
        self.mirror.remirror()
    }

    /// Load state, plan, and (unless dry-run) actuate and persist the ledger.
    pub fn sync_shop(&self, target: ShopTarget<'_>, options: &SyncOptions) -> Result<SyncOutcome> {
        let store = StateStore::new(target.transport, target.shopware_dir);
        let desired = store.load_manifest(&self.settings.mandatory)?;
        let ledger = store.load_ledger()?;
        let installed = store.installed()?;
        tracing::info!(
            shop = %target.name,
            desired = desired.len(),
            installed = installed.len(),
            recorded = ledger.len(),
            "loaded shop state"
        );

        let planner = Planner::new(self.catalog, self.settings.missing_version, self.upstream);
        let plan = planner.plan(&installed, &desired, ledger)?;

        let mut report = SyncReport::new(target.name, options.dry_run);
        let declined = match self.resolve_remirrors(&plan, options)? {
            Remirror::Declined(names) => names,
            Remirror::Done { component } => return Ok(SyncOutcome::RestartRequired { component }),
        };
        summarize(&plan, &declined, &mut report);

        if options.dry_run {
            for name in &plan.removals {
                report.action(format!("delete {name}"));
            }
            report.action("initialize theme".to_string());
            for action in plan.updates() {
                report.action(format!("update {} to {}", action.name, action.version));
            }
            report.action("clear cache".to_string());
            return Ok(SyncOutcome::Completed(report));
        }

        let actuator = RemoteActuator::new(
            target.transport,
            ShopCommands::new(target.container, target.shopware_dir),
        );

        for name in &plan.removals {
            actuator.remove(name)?;
            report.action(format!("deleted {name}"));
        }

        actuator.initialize_theme()?;
        report.action("initialized theme".to_string());

        for action in plan.updates() {
            actuator.update(action, &self.upstream.clone_url(&action.source_url))?;
            report.action(format!("updated {} to {}", action.name, action.version));
        }

        actuator.clear_cache()?;
        report.action("cleared cache".to_string());

        store.save_ledger(&plan.ledger)?;
        report.ledger_saved = true;

        Ok(SyncOutcome::Completed(report))
    }

    /// Ask about each unknown component. Stops at the first accepted remirror.
    fn resolve_remirrors(&self, plan: &Plan, options: &SyncOptions) -> Result<Remirror> {
        let mut declined = Vec::new();
        for name in plan.remirror_candidates() {
            if options.dry_run {
                declined.push(name.to_string());
                continue;
            }
            let question = format!(
                "Plugin {name} could not be found in the current repos. Reinstall the master repository?"
            );
            if self.prompt.confirm(&question) {
                if options.defer_remirror {
                    tracing::info!(component = %name, "remirror accepted, deferred to caller");
                } else {
                    tracing::info!(component = %name, "remirror accepted");
                    self.remirror()?;
                }
                return Ok(Remirror::Done {
                    component: name.to_string(),
                });
            }
            declined.push(name.to_string());
        }
        Ok(Remirror::Declined(declined))
    }
}

enum Remirror {
    /// Components the operator chose to skip this run.
    Declined(Vec<String>),
    Done { component: String },
}

fn summarize(plan: &Plan, declined: &[String], report: &mut SyncReport) {
    report.removed = plan.removals.clone();
    for outcome in &plan.outcomes {
        match outcome {
            ComponentOutcome::Update(action) => report.updated.push(action.name.clone()),
            ComponentOutcome::UpToDate { name, .. } => report.up_to_date.push(name.clone()),
            ComponentOutcome::Skipped { name, reason } => report.skipped.push(SkippedComponent {
                name: name.clone(),
                reason: reason.clone(),
            }),
            ComponentOutcome::NeedsRemirror { name } if declined.contains(name) => {
                report.skipped.push(SkippedComponent {
                    name: name.clone(),
                    reason: "not found in any mirrored repository".to_string(),
                })
            }
            ComponentOutcome::NeedsRemirror { .. } => {}
        }
    }
}
