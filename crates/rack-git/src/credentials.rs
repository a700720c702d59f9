//! Credential fallback for network git operations
//!
//! A remote operation is attempted anonymously first. When the remote answers
//! with an authentication failure the operation is retried exactly once,
//! with the credentials stored for the domain or, when none are stored, with
//! credentials supplied by the interactive prompt. A second authentication
//! failure is final.

use std::fmt;

use git2::{Cred, ErrorClass, ErrorCode, RemoteCallbacks};

use crate::{Error, Result};

/// Username and password for an https remote.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where credentials come from when a remote asks for them.
pub trait CredentialSource: Send + Sync {
    /// Credentials configured for `domain`, if any.
    fn stored(&self, domain: &str) -> Option<Credentials>;

    /// Ask the operator. `None` means the operator declined or no terminal is attached.
    fn prompt(&self, domain: &str) -> Option<Credentials>;

    /// Called after prompted credentials were accepted by the remote.
    fn remember(&self, _domain: &str, _credentials: &Credentials) {}
}

/// A source that never has credentials. Anonymous access only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCredentials;

impl CredentialSource for NoCredentials {
    fn stored(&self, _domain: &str) -> Option<Credentials> {
        None
    }

    fn prompt(&self, _domain: &str) -> Option<Credentials> {
        None
    }
}

/// Result of running an operation through the credential fallback.
#[derive(Debug)]
pub enum AuthOutcome<T> {
    /// The operation succeeded, anonymously or after authenticating.
    Ok(T),
    /// The remote wants credentials and none could be obtained.
    NeedsAuth,
    /// The operation failed; authentication failures after the retry land here too.
    Failed(Error),
}

impl<T> AuthOutcome<T> {
    pub fn into_result(self, domain: &str) -> Result<T> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::NeedsAuth => Err(Error::AuthenticationRequired {
                domain: domain.to_string(),
            }),
            Self::Failed(e) => Err(e),
        }
    }
}

/// Run `op` anonymously, then once more with credentials if the remote demands them.
pub fn resolve<T>(
    domain: &str,
    source: &dyn CredentialSource,
    mut op: impl FnMut(Option<&Credentials>) -> Result<T>,
) -> AuthOutcome<T> {
    match op(None) {
        Ok(value) => return AuthOutcome::Ok(value),
        Err(e) if e.is_auth_error() => {
            tracing::debug!(domain = %domain, "anonymous access rejected, retrying with credentials");
        }
        Err(e) => return AuthOutcome::Failed(e),
    }

    let (credentials, prompted) = match source.stored(domain) {
        Some(stored) => (stored, false),
        None => match source.prompt(domain) {
            Some(entered) => (entered, true),
            None => return AuthOutcome::NeedsAuth,
        },
    };

    match op(Some(&credentials)) {
        Ok(value) => {
            if prompted {
                source.remember(domain, &credentials);
            }
            AuthOutcome::Ok(value)
        }
        Err(e) if e.is_auth_error() => {
            tracing::warn!(domain = %domain, user = %credentials.username, "credentials rejected");
            AuthOutcome::Failed(Error::AuthenticationFailed {
                domain: domain.to_string(),
            })
        }
        Err(e) => AuthOutcome::Failed(e),
    }
}

/// Build git2 callbacks that answer at most one credential request.
///
/// libgit2 keeps invoking the callback while the server rejects the answer;
/// the second invocation is turned into an authentication error instead.
pub(crate) fn callbacks(credentials: Option<&Credentials>) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    if let Some(credentials) = credentials {
        let mut answered = false;
        callbacks.credentials(move |_url, _username, _allowed| {
            if answered {
                return Err(git2::Error::new(
                    ErrorCode::Auth,
                    ErrorClass::Http,
                    "authentication required: credentials rejected",
                ));
            }
            answered = true;
            Cred::userpass_plaintext(&credentials.username, &credentials.password)
        });
    }
    callbacks
}
