//! The transport abstraction used by the reconciliation core

use crate::command::{CommandOutput, RemoteCommand};
use crate::scripts;
use crate::{Error, Result};

/// A channel to one shop host.
///
/// Implementors provide [`Transport::exec`]; everything else is built on it.
/// Test doubles may override the provided methods directly.
pub trait Transport: Send + Sync {
    /// Human-readable destination, e.g. `deploy@shop.example.com:22`.
    fn describe(&self) -> String;

    /// Run a script on the host and capture its output. Non-zero exit is not an error here.
    fn exec(&self, command: &RemoteCommand, stdin: Option<&[u8]>) -> Result<CommandOutput>;

    /// Run a script and require it to succeed. Returns stdout.
    fn run(&self, command: &RemoteCommand) -> Result<String> {
        tracing::debug!(host = %self.describe(), command = %command, "remote");
        let output = self.exec(command, None)?;
        if output.success() {
            Ok(output.stdout_text())
        } else {
            Err(Error::CommandFailed {
                command: command.label().to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            })
        }
    }

    /// Read a file from the host. `None` when the file does not exist.
    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let command = RemoteCommand::new(scripts::read_file(path));
        let output = self.exec(&command, None)?;
        match output.exit_code {
            Some(0) => Ok(Some(output.stdout)),
            Some(scripts::NOT_FOUND_EXIT) => Ok(None),
            code => Err(Error::CommandFailed {
                command: command.label().to_string(),
                exit_code: code,
                stderr: output.stderr_text(),
            }),
        }
    }

    /// Replace a file on the host, creating parent directories.
    fn write_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let command = RemoteCommand::new(scripts::write_file(path));
        let output = self.exec(&command, Some(contents))?;
        if output.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: command.label().to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            })
        }
    }

    /// Names of the subdirectories of `dir`, in listing order.
    fn list_dirs(&self, dir: &str) -> Result<Vec<String>> {
        let stdout = self.run(&RemoteCommand::new(scripts::list_dirs(dir)))?;
        Ok(scripts::parse_dir_listing(&stdout))
    }

    /// Verify the host answers at all.
    fn check_connection(&self) -> Result<()> {
        self.run(&RemoteCommand::new("true")).map(|_| ())
    }
}
