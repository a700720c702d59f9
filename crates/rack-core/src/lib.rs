//! Reconciliation core for rackjobber
//!
//! Brings a remote Shopware shop in line with its declared plugin list:
//!
//! - **Catalog**: mirrored rackspec repositories ([`SpecCatalog`]) and the
//!   version rules that pick a spec ([`VersionResolver`])
//! - **Shop state**: the rackfile, the hash ledger, and the installed plugin
//!   directories, read and written through a [`rack_remote::Transport`]
//! - **Planning**: [`Planner`] turns desired, installed, and recorded state
//!   into removals and updates
//! - **Actuation**: [`RemoteActuator`] runs the console commands on the shop
//! - **Orchestration**: [`SyncOrchestrator`] drives one run end to end
//!
//! Operator-facing stores ([`Config`], [`ShopStore`]), catalog mirror
//! management ([`RepoManager`]), and plugin scaffolding ([`plugin`]) live
//! here too so the CLI stays a thin shell.
//!
//! # Architecture
//!
//! ```text
//!                  rack-cli
//!                     |
//!                 rack-core
//!                     |
//!      +--------------+--------------+
//!      |              |              |
//!   rack-fs       rack-git      rack-remote
//! ```

pub mod actuate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod manifest;
pub mod orchestrator;
pub mod plan;
pub mod plugin;
pub mod reference;
pub mod repos;
pub mod shops;
pub mod spec;
pub mod state;
pub mod version;

mod yaml;

pub use actuate::{RemoteActuator, ShopCommands};
pub use catalog::SpecCatalog;
pub use config::{AccountStore, Config, CredentialPrompt, GitAccount};
pub use error::{Error, ErrorKind, Result};
pub use ledger::{HashEntry, HashLedger};
pub use manifest::{DesiredManifest, Rackfile};
pub use orchestrator::{
    CatalogMirror, FixedAnswer, Prompt, ShopTarget, SkippedComponent, SyncOptions, SyncOrchestrator,
    SyncOutcome, SyncReport, SyncSettings,
};
pub use plan::{CheckoutMode, ComponentOutcome, Plan, Planner, Steps, UpdateAction, Upstream};
pub use reference::{ComponentReference, Flag, VersionSelector};
pub use repos::RepoManager;
pub use shops::{Shop, ShopStore};
pub use spec::ComponentSpec;
pub use state::{InstalledSet, StateStore};
pub use version::{MissingVersionPolicy, VersionResolver};
