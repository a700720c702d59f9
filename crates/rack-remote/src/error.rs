use std::time::Duration;

/// Errors raised while talking to a shop host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The local helper process (`ssh` or `sh`) could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// A command did not finish in time and was killed.
    #[error("command '{command}' timed out after {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    /// A command ran but exited unsuccessfully.
    #[error("command '{command}' failed with exit code {}: {stderr}", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The host could not be reached.
    #[error("cannot connect to {address}: {message}")]
    Connection { address: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure is about reaching the host rather than a command's own result.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. } | Self::Spawn { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
