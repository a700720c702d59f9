//! Error types for rack-git

use std::path::PathBuf;

/// Result type for rack-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rack-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] rack_fs::Error),

    #[error("Invalid repository URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Authentication required for {domain} but no credentials were provided")]
    AuthenticationRequired { domain: String },

    #[error("Username or password for {domain} are wrong")]
    AuthenticationFailed { domain: String },

    #[error("No git repository at {path}")]
    NotARepository { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Repository at {path} has a detached HEAD")]
    DetachedHead { path: PathBuf },

    #[error("Cannot fast-forward: {message}")]
    CannotFastForward { message: String },

    #[error("Push of {reference} rejected: {message}")]
    PushRejected { reference: String, message: String },

    #[error("Tag '{tag}' not found on {url}")]
    TagNotFound { url: String, tag: String },
}

impl Error {
    /// Whether this error means the remote refused us for lack of valid credentials.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Git(e) => is_auth_failure(e),
            Self::AuthenticationRequired { .. } | Self::AuthenticationFailed { .. } => true,
            _ => false,
        }
    }
}

/// Classify a raw git2 error as an authentication failure.
pub(crate) fn is_auth_failure(e: &git2::Error) -> bool {
    if e.code() == git2::ErrorCode::Auth {
        return true;
    }
    let message = e.message().to_lowercase();
    message.contains("authentication required")
        || (e.class() == git2::ErrorClass::Http && message.contains("401"))
}
