//! Reading tag hashes from an upstream remote without cloning it

use git2::{Direction, Remote};

use crate::credentials::{Credentials, callbacks};
use crate::Result;

/// A reference advertised by a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub name: String,
    pub oid: String,
}

impl RemoteRef {
    pub fn new(name: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            oid: oid.into(),
        }
    }
}

/// List the references advertised by `url`.
pub fn list_remote_refs(url: &str, credentials: Option<&Credentials>) -> Result<Vec<RemoteRef>> {
    let mut remote = Remote::create_detached(url)?;
    let connection = remote.connect_auth(Direction::Fetch, Some(callbacks(credentials)), None)?;
    let refs = connection
        .list()?
        .iter()
        .map(|head| RemoteRef::new(head.name(), head.oid().to_string()))
        .collect();
    Ok(refs)
}

/// Pick the commit hash for `tag` out of an advertisement.
///
/// Annotated tags are advertised twice: the tag object under `refs/tags/<tag>`
/// and the commit it points at under `refs/tags/<tag>^{}`. The peeled entry
/// wins so annotated and lightweight tags both yield a commit hash.
pub fn select_tag_hash(refs: &[RemoteRef], tag: &str) -> Option<String> {
    let plain = format!("refs/tags/{tag}");
    let peeled = format!("{plain}^{{}}");
    refs.iter()
        .find(|r| r.name == peeled)
        .or_else(|| refs.iter().find(|r| r.name == plain))
        .map(|r| r.oid.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn advertisement() -> Vec<RemoteRef> {
        vec![
            RemoteRef::new("HEAD", "aaaa"),
            RemoteRef::new("refs/heads/main", "aaaa"),
            RemoteRef::new("refs/tags/1.0.0", "bbbb"),
            RemoteRef::new("refs/tags/1.1.0", "tagobj"),
            RemoteRef::new("refs/tags/1.1.0^{}", "cccc"),
        ]
    }

    #[test]
    fn lightweight_tag_hash() {
        assert_eq!(select_tag_hash(&advertisement(), "1.0.0").as_deref(), Some("bbbb"));
    }

    #[test]
    fn annotated_tag_prefers_peeled_commit() {
        assert_eq!(select_tag_hash(&advertisement(), "1.1.0").as_deref(), Some("cccc"));
    }

    #[test]
    fn missing_tag_is_none() {
        assert_eq!(select_tag_hash(&advertisement(), "2.0.0"), None);
    }

    #[test]
    fn branch_names_are_not_tags() {
        assert_eq!(select_tag_hash(&advertisement(), "main"), None);
    }
}
