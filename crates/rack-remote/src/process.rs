//! Running a local helper process with a deadline

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::command::CommandOutput;
use crate::{Error, Result};

pub const DEFAULT_COMMAND_SECS: u64 = 600;
pub const DEFAULT_CONNECT_SECS: u64 = 15;

/// Deadlines for one remote command and for establishing the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub command: Duration,
    pub connect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            command: Duration::from_secs(DEFAULT_COMMAND_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_SECS),
        }
    }
}

impl Timeouts {
    pub fn from_secs(command: u64, connect: u64) -> Self {
        Self {
            command: Duration::from_secs(command),
            connect: Duration::from_secs(connect),
        }
    }
}

/// Spawn `cmd`, feed it `stdin`, and wait at most `timeout` for it to exit.
///
/// Output is drained on background threads so a chatty child cannot block on
/// a full pipe while we wait. On timeout the child is killed and reaped.
pub fn run(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
    label: &str,
) -> Result<CommandOutput> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| Error::Spawn { program, source })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    if let Some(input) = stdin
        && let Some(mut pipe) = child.stdin.take()
    {
        // A child that exits early closes its end; the exit status reports that.
        if let Err(e) = pipe.write_all(input) {
            tracing::debug!(command = %label, error = %e, "stdin closed early");
        }
    }

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            kill(&mut child);
            return Err(Error::Timeout {
                command: label.to_string(),
                timeout,
            });
        }
    };

    Ok(CommandOutput {
        exit_code: status.code(),
        stdout: join(stdout),
        stderr: join(stderr),
    })
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<Vec<u8>>> {
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            buf
        })
    })
}

fn join(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
