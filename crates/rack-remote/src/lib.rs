//! Remote transport for rackjobber
//!
//! A shop host is reached through a [`Transport`]: something that can run a
//! shell script on the host and move small files to and from it. The SSH
//! transport drives the system `ssh` client, the local transport drives `sh`
//! on this machine. Every command is bounded by a timeout.

pub mod command;
pub mod error;
pub mod local;
pub mod process;
pub mod scripts;
pub mod ssh;
pub mod transport;

pub use command::{CommandOutput, RemoteCommand};
pub use error::{Error, Result};
pub use local::LocalTransport;
pub use process::Timeouts;
pub use ssh::SshTransport;
pub use transport::Transport;
