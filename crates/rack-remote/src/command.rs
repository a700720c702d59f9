//! Commands sent to a shop host

use std::fmt;

/// A shell script to run on the host, with the label used in logs and errors.
///
/// The label differs from the script only when the script embeds secrets,
/// such as a clone URL carrying credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    script: String,
    label: String,
}

impl RemoteCommand {
    pub fn new(script: impl Into<String>) -> Self {
        let script = script.into();
        Self {
            label: script.clone(),
            script,
        }
    }

    /// A command whose script must never be shown; `label` is shown instead.
    pub fn redacted(script: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            label: label.into(),
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Debug for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RemoteCommand").field(&self.label).finish()
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}
