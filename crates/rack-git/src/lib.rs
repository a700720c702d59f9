//! Git collaborator for rackjobber
//!
//! Wraps `git2` for the operations the catalog and the reconciliation core
//! need: mirroring catalog repositories, publishing specs, and reading the
//! commit a version tag points at on an upstream remote. Every network
//! operation runs through [`credentials::resolve`], which retries once with
//! stored or prompted credentials after an authentication failure.

pub mod client;
pub mod credentials;
pub mod error;
pub mod mirror;
pub mod publish;
pub mod remote_url;
pub mod tags;

pub use client::GitClient;
pub use credentials::{AuthOutcome, CredentialSource, Credentials, NoCredentials};
pub use error::{Error, Result};
pub use mirror::MirrorStatus;
pub use tags::RemoteRef;
