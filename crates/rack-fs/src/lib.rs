//! Filesystem primitives for rackjobber
//!
//! Provides atomic file I/O, format-agnostic config loading and the
//! resource folder layout (catalog mirrors, operator config, shop store).

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;

pub use config::ConfigStore;
pub use constants::ResourcePath;
pub use error::{Error, Result};
pub use layout::ResourceLayout;
