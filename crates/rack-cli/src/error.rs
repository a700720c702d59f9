//! Error types for rack-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from rack-core
    #[error(transparent)]
    Core(#[from] rack_core::Error),

    /// Error from rack-fs
    #[error(transparent)]
    Fs(#[from] rack_fs::Error),

    /// Error from rack-git
    #[error(transparent)]
    Git(#[from] rack_git::Error),

    /// Error from rack-remote
    #[error(transparent)]
    Remote(#[from] rack_remote::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
