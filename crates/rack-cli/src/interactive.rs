//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal questions. When stdin is not a terminal every
//! question is answered with its safe default so scripted runs never block.

use std::io::IsTerminal;
use std::sync::Mutex;

use dialoguer::{Confirm, Input, Password};
use rack_core::{CredentialPrompt, Prompt};
use rack_git::Credentials;

use crate::error::Result;

/// Whether questions can be asked at all.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }
    Ok(Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()?)
}

/// Read a secret without echo.
pub fn password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Yes/no answers for the sync engine.
///
/// Shops sync on separate threads; the lock keeps their questions from
/// interleaving on the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    lock: Mutex<()>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !is_interactive() {
            tracing::warn!(question, "not a terminal, answering no");
            return false;
        }
        confirm(question).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "prompt failed, answering no");
            false
        })
    }
}

/// Asks for git credentials when a host rejects the stored ones.
#[derive(Debug, Default)]
pub struct TerminalCredentials {
    lock: Mutex<()>,
}

impl TerminalCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    fn ask_inner(&self, domain: &str) -> Result<Credentials> {
        eprintln!("Authentication required for {domain}");
        let username: String = Input::new().with_prompt("Username").interact_text()?;
        let password = password("Password")?;
        Ok(Credentials::new(username, password))
    }
}

impl CredentialPrompt for TerminalCredentials {
    fn ask(&self, domain: &str) -> Option<Credentials> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !is_interactive() {
            return None;
        }
        match self.ask_inner(domain) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                tracing::warn!(domain, error = %e, "credential prompt failed");
                None
            }
        }
    }
}
