//! Transport over the system `ssh` client
//!
//! Key-based authentication is expected; `BatchMode` stops ssh from asking
//! for a password on a terminal we do not own.

use std::process::Command;

use crate::command::{CommandOutput, RemoteCommand};
use crate::process::{self, Timeouts};
use crate::transport::Transport;
use crate::{Error, Result};

/// ssh exits with 255 when the connection itself fails.
const SSH_CONNECTION_FAILURE: i32 = 255;

#[derive(Debug, Clone)]
pub struct SshTransport {
    address: String,
    user: String,
    port: Option<u16>,
    timeouts: Timeouts,
}

impl SshTransport {
    pub fn new(address: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            user: user.into(),
            port: None,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    fn destination(&self) -> String {
        if self.user.is_empty() {
            self.address.clone()
        } else {
            format!("{}@{}", self.user, self.address)
        }
    }

    /// Arguments passed to `ssh` before the remote script.
    pub fn ssh_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("ConnectTimeout={}", self.timeouts.connect.as_secs().max(1)),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
        ];
        if let Some(port) = self.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        args.push(self.destination());
        args
    }
}

impl Transport for SshTransport {
    fn describe(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.destination(), port),
            None => self.destination(),
        }
    }

    fn exec(&self, command: &RemoteCommand, stdin: Option<&[u8]>) -> Result<CommandOutput> {
        let mut cmd = Command::new("ssh");
        cmd.args(self.ssh_args()).arg(command.script());
        let output = process::run(cmd, stdin, self.timeouts.command, command.label())?;
        if output.exit_code == Some(SSH_CONNECTION_FAILURE) {
            return Err(Error::Connection {
                address: self.describe(),
                message: output.stderr_text(),
            });
        }
        Ok(output)
    }
}
