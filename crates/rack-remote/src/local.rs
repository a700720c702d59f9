//! Transport for a shop running on this machine

use std::process::Command;

use crate::command::{CommandOutput, RemoteCommand};
use crate::process::{self, Timeouts};
use crate::transport::Transport;
use crate::Result;

/// Runs scripts with the local `sh`.
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    timeouts: Timeouts,
}

impl LocalTransport {
    pub fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }
}

impl Transport for LocalTransport {
    fn describe(&self) -> String {
        "localhost".to_string()
    }

    fn exec(&self, command: &RemoteCommand, stdin: Option<&[u8]>) -> Result<CommandOutput> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command.script());
        process::run(cmd, stdin, self.timeouts.command, command.label())
    }
}
