//! Credential-aware entry point for git operations

use std::path::Path;
use std::sync::Arc;

use crate::credentials::{CredentialSource, NoCredentials, resolve};
use crate::mirror::{self, MirrorStatus};
use crate::remote_url::{domain_of, redact, with_credentials};
use crate::{Error, Result, publish, tags};

/// Runs git operations through the anonymous-then-authenticated fallback.
#[derive(Clone)]
pub struct GitClient {
    credentials: Arc<dyn CredentialSource>,
}

impl Default for GitClient {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl std::fmt::Debug for GitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitClient").finish_non_exhaustive()
    }
}

impl GitClient {
    pub fn new(credentials: Arc<dyn CredentialSource>) -> Self {
        Self { credentials }
    }

    /// A client that never authenticates.
    pub fn anonymous() -> Self {
        Self::new(Arc::new(NoCredentials))
    }

    fn domain(url: &str) -> String {
        domain_of(url).unwrap_or_default()
    }

    /// Clone `url` into `dest`.
    pub fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let domain = Self::domain(url);
        tracing::info!(url = %redact(url), dest = %dest.display(), "cloning");
        resolve(&domain, self.credentials.as_ref(), |creds| {
            mirror::clone(url, dest, creds)
        })
        .into_result(&domain)
    }

    /// Fast-forward an existing clone from its origin.
    pub fn update(&self, path: &Path) -> Result<MirrorStatus> {
        let domain = Self::domain(&mirror::remote_url(path)?);
        resolve(&domain, self.credentials.as_ref(), |creds| {
            mirror::update(path, creds)
        })
        .into_result(&domain)
    }

    /// Clone `url` into `path` when absent, otherwise update the existing clone.
    pub fn mirror(&self, url: &str, path: &Path) -> Result<MirrorStatus> {
        if path.join(".git").exists() {
            self.update(path)
        } else {
            self.clone_repo(url, path).map(|()| MirrorStatus::Cloned)
        }
    }

    /// Push the checked-out branch of `path` to origin.
    pub fn push(&self, path: &Path) -> Result<()> {
        let domain = Self::domain(&mirror::remote_url(path)?);
        resolve(&domain, self.credentials.as_ref(), |creds| {
            publish::push(path, creds)
        })
        .into_result(&domain)
    }

    /// URL of the origin remote of a local clone.
    pub fn remote_url(&self, path: &Path) -> Result<String> {
        mirror::remote_url(path)
    }

    /// Commit hash that `tag` points at on the remote `url`.
    pub fn latest_tag_hash(&self, url: &str, tag: &str) -> Result<String> {
        let domain = Self::domain(url);
        let refs = resolve(&domain, self.credentials.as_ref(), |creds| {
            tags::list_remote_refs(url, creds)
        })
        .into_result(&domain)?;
        tags::select_tag_hash(&refs, tag).ok_or_else(|| Error::TagNotFound {
            url: redact(url),
            tag: tag.to_string(),
        })
    }

    /// `url` with the stored credentials for its domain injected, for use on the shop host.
    ///
    /// Returns the URL unchanged when no credentials are stored or the URL is not http(s).
    pub fn authenticated_url(&self, url: &str) -> String {
        let Some(domain) = domain_of(url) else {
            return url.to_string();
        };
        match self.credentials.stored(&domain) {
            Some(creds) => with_credentials(url, &creds).unwrap_or_else(|_| url.to_string()),
            None => url.to_string(),
        }
    }
}
