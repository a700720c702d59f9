//! Shared test fixtures for the rackjobber workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: real git repositories with commits and tags, driven by the `git` CLI
//! - [`catalog`]: [`catalog::TestCatalog`] for laying out rackspec catalogs on disk
//! - [`transport`]: [`transport::FakeTransport`], an in-memory shop host that records commands

pub mod catalog;
pub mod git;
pub mod transport;
