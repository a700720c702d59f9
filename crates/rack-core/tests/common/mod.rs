//! Fakes shared by the rack-core integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use rack_core::{CatalogMirror, Error, Prompt, Result, Upstream};

pub const SHOP_DIR: &str = "/srv/shop";
pub const CONTAINER: &str = "shop_app";
pub const RACKFILE: &str = "/srv/shop/custom/rackfile.yaml";
pub const LEDGER: &str = "/srv/shop/custom/rackpluginhashes.yaml";
pub const PLUGINS: &str = "/srv/shop/custom/plugins";

/// `docker exec` prefix the actuator puts in front of console commands.
pub fn console(args: &str) -> String {
    format!("docker exec -i {CONTAINER} php /var/www/html/bin/console {args}")
}

pub fn source(name: &str) -> String {
    format!("https://git.example.com/wdy/{name}.git")
}

#[derive(Debug, Clone, Copy)]
pub enum HashFailure {
    MissingTag,
    Network,
    Auth,
}

/// Upstream tag hashes keyed by source URL and version.
#[derive(Default)]
pub struct FakeUpstream {
    hashes: Mutex<HashMap<(String, String), String>>,
    failures: Mutex<HashMap<String, HashFailure>>,
    lookups: Mutex<Vec<String>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(self, name: &str, version: &str, hash: &str) -> Self {
        self.set_hash(name, version, hash);
        self
    }

    pub fn with_failure(self, name: &str, failure: HashFailure) -> Self {
        self.failures.lock().unwrap().insert(source(name), failure);
        self
    }

    /// Move the tag for `name`/`version` to a new commit.
    pub fn set_hash(&self, name: &str, version: &str, hash: &str) {
        self.hashes
            .lock()
            .unwrap()
            .insert((source(name), version.to_string()), hash.to_string());
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Upstream for FakeUpstream {
    fn latest_hash(&self, source_url: &str, version: &str) -> Result<String> {
        self.lookups
            .lock()
            .unwrap()
            .push(format!("{source_url}@{version}"));
        if let Some(failure) = self.failures.lock().unwrap().get(source_url) {
            let error = match failure {
                HashFailure::MissingTag => rack_git::Error::TagNotFound {
                    url: source_url.to_string(),
                    tag: version.to_string(),
                },
                HashFailure::Network => rack_git::Error::InvalidUrl {
                    url: source_url.to_string(),
                    message: "connection refused".to_string(),
                },
                HashFailure::Auth => rack_git::Error::AuthenticationFailed {
                    domain: "git.example.com".to_string(),
                },
            };
            return Err(Error::Git(error));
        }
        self.hashes
            .lock()
            .unwrap()
            .get(&(source_url.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| {
                Error::Git(rack_git::Error::TagNotFound {
                    url: source_url.to_string(),
                    tag: version.to_string(),
                })
            })
    }

    fn clone_url(&self, source_url: &str) -> String {
        source_url.replace("https://", "https://ci:s3cret@")
    }
}

/// Answers prompts from a script and records the questions.
pub struct ScriptedPrompt {
    answers: Mutex<Vec<bool>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().rev().copied().collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers.lock().unwrap().pop().unwrap_or(false)
    }
}

/// Counts refreshes and remirrors; the refresh result can be scripted.
#[derive(Default)]
pub struct FakeMirror {
    refreshes: Mutex<usize>,
    remirrors: Mutex<usize>,
    refresh_error: Mutex<Option<fn() -> Error>>,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_refresh(self, error: fn() -> Error) -> Self {
        *self.refresh_error.lock().unwrap() = Some(error);
        self
    }

    pub fn refreshes(&self) -> usize {
        *self.refreshes.lock().unwrap()
    }

    pub fn remirrors(&self) -> usize {
        *self.remirrors.lock().unwrap()
    }
}

impl CatalogMirror for FakeMirror {
    fn refresh(&self) -> Result<()> {
        *self.refreshes.lock().unwrap() += 1;
        match *self.refresh_error.lock().unwrap() {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }

    fn remirror(&self) -> Result<()> {
        *self.remirrors.lock().unwrap() += 1;
        Ok(())
    }
}
