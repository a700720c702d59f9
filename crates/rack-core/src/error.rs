//! Error types for rack-core

use std::path::PathBuf;

/// Result type for rack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// How an error affects a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A component, spec, or file is absent. Recoverable by defaulting or skipping.
    NotFound,
    /// The shop host or a git remote could not be reached, or a remote command failed.
    Transport,
    /// Credentials were rejected after the single retry.
    Authentication,
    /// Data disagrees with itself, e.g. a declared version with no upstream tag.
    Inconsistency,
    /// Local failures that fit nowhere else.
    Internal,
}

/// Errors that can occur in rack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid component reference '{token}': {reason}")]
    InvalidReference { token: String, reason: String },

    #[error("Component '{name}' not found in any mirrored repository")]
    ComponentNotFound { name: String },

    #[error("No rackspec for {name} {version} in repository '{repo}'")]
    SpecNotFound {
        repo: String,
        name: String,
        version: String,
    },

    #[error("No version directory of '{name}' is a valid version")]
    NoParseableVersion { name: String },

    #[error("Invalid rackspec {path}: {message}")]
    InvalidSpec { path: PathBuf, message: String },

    #[error("Malformed remote file {path}: {message}")]
    MalformedRemoteFile { path: String, message: String },

    #[error("Version tag '{version}' not found for {name}")]
    MissingTag { name: String, version: String },

    #[error("Version mismatch: rackspec says {spec}, plugin.xml says {plugin_xml}")]
    VersionMismatch { spec: String, plugin_xml: String },

    #[error("Repository '{name}' not found")]
    RepoNotFound { name: String },

    #[error("Repository '{name}' already exists")]
    RepoExists { name: String },

    #[error("Shop '{name}' not found")]
    ShopNotFound { name: String },

    #[error("Shop '{name}' already exists")]
    ShopExists { name: String },

    #[error("No account for domain '{domain}'")]
    AccountNotFound { domain: String },

    #[error("No rackspec found in {dir}")]
    RackspecNotFound { dir: PathBuf },

    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },

    #[error("No plugin.xml found in {dir}")]
    PluginXmlNotFound { dir: PathBuf },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // Transparent wrappers for collaborator crate errors
    #[error(transparent)]
    Fs(#[from] rack_fs::Error),

    #[error(transparent)]
    Git(#[from] rack_git::Error),

    #[error(transparent)]
    Remote(#[from] rack_remote::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ComponentNotFound { .. }
            | Self::SpecNotFound { .. }
            | Self::RepoNotFound { .. }
            | Self::ShopNotFound { .. }
            | Self::AccountNotFound { .. }
            | Self::RackspecNotFound { .. }
            | Self::PluginXmlNotFound { .. } => ErrorKind::NotFound,

            Self::InvalidReference { .. }
            | Self::NoParseableVersion { .. }
            | Self::InvalidSpec { .. }
            | Self::MalformedRemoteFile { .. }
            | Self::MissingTag { .. }
            | Self::VersionMismatch { .. }
            | Self::Yaml(_) => ErrorKind::Inconsistency,

            Self::Git(e) if e.is_auth_error() => ErrorKind::Authentication,
            Self::Git(rack_git::Error::TagNotFound { .. }) => ErrorKind::Inconsistency,
            Self::Git(rack_git::Error::NotARepository { .. }) => ErrorKind::NotFound,
            Self::Git(_) | Self::Remote(_) => ErrorKind::Transport,

            Self::Fs(e) if e.is_not_found() => ErrorKind::NotFound,

            Self::RepoExists { .. }
            | Self::ShopExists { .. }
            | Self::AlreadyExists { .. }
            | Self::InvalidInput { .. }
            | Self::Fs(_)
            | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Transport and authentication failures end the run; nothing is written afterwards.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Authentication)
    }
}
