//! In-memory stand-in for a shop host.
//!
//! [`FakeTransport`] keeps a file map and a directory map, records every
//! command it is asked to run, and can be told to fail commands containing a
//! given substring.

use std::collections::BTreeMap;
use std::sync::Mutex;

use rack_remote::{CommandOutput, Error, RemoteCommand, Result, Transport};

#[derive(Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeMap<String, Vec<String>>,
    commands: Vec<String>,
    failures: Vec<String>,
    writes: usize,
    unreachable: bool,
}

#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<State>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file on the fake host.
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.lock().files.insert(path.to_string(), contents.as_bytes().to_vec());
        self
    }

    /// Seed the subdirectories of `dir`.
    pub fn with_dirs(self, dir: &str, names: &[&str]) -> Self {
        self.lock()
            .dirs
            .insert(dir.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Replace the subdirectories of `dir` on an already shared fake.
    pub fn set_dirs(&self, dir: &str, names: &[&str]) {
        self.lock()
            .dirs
            .insert(dir.to_string(), names.iter().map(|n| n.to_string()).collect());
    }

    /// Fail every command whose label contains `needle`.
    pub fn fail_on(self, needle: &str) -> Self {
        self.lock().failures.push(needle.to_string());
        self
    }

    /// Make every operation fail as if the host were down.
    pub fn unreachable(self) -> Self {
        self.lock().unreachable = true;
        self
    }

    /// Labels of all commands run so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.lock().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.lock().commands.clear();
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.lock()
            .files
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Number of successful `write_file` calls.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_reachable(&self) -> Result<()> {
        if self.lock().unreachable {
            Err(Error::Connection {
                address: "fake".to_string(),
                message: "host unreachable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Transport for FakeTransport {
    fn describe(&self) -> String {
        "fake".to_string()
    }

    fn exec(&self, command: &RemoteCommand, _stdin: Option<&[u8]>) -> Result<CommandOutput> {
        self.check_reachable()?;
        let mut state = self.lock();
        state.commands.push(command.label().to_string());
        let failed = state.failures.iter().any(|f| command.label().contains(f.as_str()));
        Ok(CommandOutput {
            exit_code: Some(if failed { 1 } else { 0 }),
            stdout: Vec::new(),
            stderr: if failed { b"injected failure".to_vec() } else { Vec::new() },
        })
    }

    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.check_reachable()?;
        Ok(self.lock().files.get(path).cloned())
    }

    fn write_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        self.check_reachable()?;
        let mut state = self.lock();
        state.files.insert(path.to_string(), contents.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn list_dirs(&self, dir: &str) -> Result<Vec<String>> {
        self.check_reachable()?;
        Ok(self.lock().dirs.get(dir).cloned().unwrap_or_default())
    }

    fn check_connection(&self) -> Result<()> {
        self.check_reachable()
    }
}
