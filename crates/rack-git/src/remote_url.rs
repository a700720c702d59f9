//! Remote URL helpers
//!
//! Catalog and plugin repositories are addressed by https URLs. Credentials
//! are keyed by the URL's host, and the shop host clones plugins through a
//! URL that carries the credentials inline.

use url::Url;

use crate::credentials::Credentials;
use crate::{Error, Result};

/// Host part of a remote URL, used as the credential key.
///
/// Understands scp-like `git@host:path` addresses. Local paths have no domain.
pub fn domain_of(remote: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(remote) {
        return parsed.host_str().map(str::to_string);
    }
    // git@host:owner/repo.git
    let (user_host, _path) = remote.split_once(':')?;
    let host = user_host.rsplit_once('@').map_or(user_host, |(_, host)| host);
    if host.is_empty() || host.contains('/') {
        None
    } else {
        Some(host.to_string())
    }
}

/// Inject `username:password@` into an http(s) URL.
///
/// Reserved characters in the username or password are percent-encoded,
/// so an e-mail address as username ends up as `name%40host`.
pub fn with_credentials(remote: &str, credentials: &Credentials) -> Result<String> {
    let mut parsed = Url::parse(remote).map_err(|e| Error::InvalidUrl {
        url: remote.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl {
            url: remote.to_string(),
            message: "credentials can only be embedded in http(s) URLs".to_string(),
        });
    }
    let invalid = |_| Error::InvalidUrl {
        url: remote.to_string(),
        message: "URL cannot carry credentials".to_string(),
    };
    parsed.set_username(&credentials.username).map_err(invalid)?;
    parsed
        .set_password(Some(&credentials.password))
        .map_err(invalid)?;
    Ok(parsed.to_string())
}

/// Strip any inline credentials so the URL can be logged.
pub fn redact(remote: &str) -> String {
    match Url::parse(remote) {
        Ok(mut parsed) if !parsed.username().is_empty() || parsed.password().is_some() => {
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.to_string()
        }
        _ => remote.to_string(),
    }
}
