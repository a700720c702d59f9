//! Commit and push changes made inside a catalog mirror

use std::path::Path;

use git2::{IndexAddOption, Oid, PushOptions, ResetType, Signature};

use crate::credentials::{Credentials, callbacks};
use crate::mirror::{current_branch, open};
use crate::{Error, Result};

const FALLBACK_NAME: &str = "Rack Jobber";
const FALLBACK_EMAIL: &str = "rackjobber@localhost";

/// Stage everything below `pathspec` (relative to the repo root) and commit it.
///
/// Deletions are staged too, so removing a spec directory and committing it works.
pub fn commit_all(repo_path: &Path, pathspec: &str, message: &str) -> Result<Oid> {
    let repo = open(repo_path)?;
    let mut index = repo.index()?;
    index.add_all([pathspec], IndexAddOption::DEFAULT, None)?;
    index.update_all([pathspec], None)?;
    index.write()?;

    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = repo
        .signature()
        .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<_> = parent.iter().collect();

    let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
    tracing::debug!(commit = %oid, "committed {pathspec}");
    Ok(oid)
}

/// Commit HEAD points at, `None` in an empty repository.
pub fn head_commit(repo_path: &Path) -> Result<Option<Oid>> {
    let repo = open(repo_path)?;
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
        Err(_) => Ok(None),
    }
}

/// Move the checked-out branch back to `oid`, discarding later commits.
///
/// Untracked files are left in place.
pub fn reset_hard(repo_path: &Path, oid: Oid) -> Result<()> {
    let repo = open(repo_path)?;
    let target = repo.find_object(oid, None)?;
    repo.reset(&target, ResetType::Hard, None)?;
    tracing::debug!(commit = %oid, "reset {}", repo_path.display());
    Ok(())
}

/// Push the checked-out branch to origin.
pub fn push(repo_path: &Path, credentials: Option<&Credentials>) -> Result<()> {
    let repo = open(repo_path)?;
    let branch = current_branch(&repo)?.ok_or_else(|| Error::DetachedHead {
        path: repo_path.to_path_buf(),
    })?;
    let mut remote = repo
        .find_remote("origin")
        .map_err(|_| Error::RemoteNotFound {
            name: "origin".to_string(),
        })?;

    let mut rejection = None;
    {
        let mut cbs = callbacks(credentials);
        cbs.push_update_reference(|reference, status| {
            if let Some(message) = status {
                rejection = Some((reference.to_string(), message.to_string()));
            }
            Ok(())
        });
        let mut options = PushOptions::new();
        options.remote_callbacks(cbs);

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[&refspec], Some(&mut options))?;
    }

    match rejection {
        Some((reference, message)) => Err(Error::PushRejected { reference, message }),
        None => Ok(()),
    }
}
