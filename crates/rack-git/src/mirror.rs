//! Local mirrors of catalog repositories
//!
//! Mirrors are plain clones. Updating one is a fetch of the checked-out
//! branch followed by a fast-forward; diverged mirrors are reported instead
//! of merged.

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{FetchOptions, Repository};

use crate::credentials::{Credentials, callbacks};
use crate::{Error, Result};

/// What happened to a mirror during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorStatus {
    Cloned,
    Updated { from: String, to: String },
    AlreadyUpToDate,
}

/// Open an existing repository, mapping a missing one to [`Error::NotARepository`].
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound {
            Error::NotARepository {
                path: path.to_path_buf(),
            }
        } else {
            Error::Git(e)
        }
    })
}

/// Clone `url` into `dest`. A partially created destination is removed on failure.
pub fn clone(url: &str, dest: &Path, credentials: Option<&Credentials>) -> Result<()> {
    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks(credentials));

    let existed = dest.exists();
    match RepoBuilder::new().fetch_options(fetch).clone(url, dest) {
        Ok(_) => Ok(()),
        Err(e) => {
            if !existed {
                rack_fs::io::remove_dir_all(dest)?;
            }
            Err(Error::Git(e))
        }
    }
}

/// Get the current branch name, or `None` for a detached HEAD.
pub fn current_branch(repo: &Repository) -> Result<Option<String>> {
    let head = repo.head()?;
    if head.is_branch() {
        Ok(head.shorthand().map(str::to_string))
    } else {
        Ok(None)
    }
}

/// URL of the `origin` remote, falling back to the first configured remote.
pub fn remote_url(path: &Path) -> Result<String> {
    let repo = open(path)?;
    let remote = match repo.find_remote("origin") {
        Ok(remote) => remote,
        Err(_) => {
            let names = repo.remotes()?;
            let first = names
                .iter()
                .flatten()
                .next()
                .ok_or_else(|| Error::RemoteNotFound {
                    name: "origin".to_string(),
                })?
                .to_string();
            repo.find_remote(&first)?
        }
    };
    remote
        .url()
        .map(str::to_string)
        .ok_or_else(|| Error::RemoteNotFound {
            name: remote.name().unwrap_or("origin").to_string(),
        })
}

/// Fetch the checked-out branch from origin and fast-forward to it.
pub fn update(path: &Path, credentials: Option<&Credentials>) -> Result<MirrorStatus> {
    let repo = open(path)?;
    let branch = current_branch(&repo)?.ok_or_else(|| Error::DetachedHead {
        path: path.to_path_buf(),
    })?;

    let mut remote = repo
        .find_remote("origin")
        .map_err(|_| Error::RemoteNotFound {
            name: "origin".to_string(),
        })?;

    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks(credentials));
    remote.fetch(&[&branch], Some(&mut fetch), None)?;

    let fetch_commit = repo.find_reference("FETCH_HEAD")?.peel_to_commit()?;
    let head_commit = repo.head()?.peel_to_commit()?;

    let (analysis, _) = repo.merge_analysis(&[&repo.find_annotated_commit(fetch_commit.id())?])?;

    if analysis.is_up_to_date() {
        return Ok(MirrorStatus::AlreadyUpToDate);
    }

    if analysis.is_fast_forward() {
        let refname = format!("refs/heads/{branch}");
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(
            fetch_commit.id(),
            &format!("mirror: fast-forward to {}", fetch_commit.id()),
        )?;
        repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
        return Ok(MirrorStatus::Updated {
            from: head_commit.id().to_string(),
            to: fetch_commit.id().to_string(),
        });
    }

    Err(Error::CannotFastForward {
        message: format!(
            "mirror {} diverged on {} ({} vs {})",
            path.display(),
            branch,
            head_commit.id(),
            fetch_commit.id()
        ),
    })
}
