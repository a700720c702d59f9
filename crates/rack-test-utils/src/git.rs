//! Git repository fixtures.
//!
//! The fixtures shell out to the `git` CLI so they exercise the same on-disk
//! format a developer's machine produces. All helpers panic on failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run `git <args>` in `path` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be started or exits unsuccessfully.
pub fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure(path: &Path) {
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    git(path, &["config", "tag.gpgsign", "false"]);
}

/// Initialises an empty repository with `git2` (no commit, no config).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a repository on branch `main` with one commit of `README.md`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    fs::create_dir_all(path).unwrap_or_else(|e| panic!("failed to create {}: {e}", path.display()));
    git(path, &["-c", "init.defaultBranch=main", "init"]);
    configure(path);
    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("failed to write README.md: {e}"));
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
}

/// Write `contents` to `rel` inside the repository, commit it, and return the commit id.
pub fn commit_file(path: &Path, rel: &str, contents: &str, message: &str) -> String {
    let file = path.join(rel);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("failed to create {}: {e}", parent.display()));
    }
    fs::write(&file, contents).unwrap_or_else(|e| panic!("failed to write {}: {e}", file.display()));
    git(path, &["add", "-A"]);
    git(path, &["commit", "-m", message]);
    head_commit(path)
}

/// Commit id of HEAD.
pub fn head_commit(path: &Path) -> String {
    git(path, &["rev-parse", "HEAD"])
}

/// Create a lightweight tag at HEAD and return the commit id it points at.
pub fn tag(path: &Path, name: &str) -> String {
    git(path, &["tag", name]);
    head_commit(path)
}

/// Create an annotated tag at HEAD and return the commit id it peels to.
pub fn annotated_tag(path: &Path, name: &str, message: &str) -> String {
    git(path, &["tag", "-a", name, "-m", message]);
    head_commit(path)
}

/// Create a bare upstream at `<dir>/<name>.git` seeded from a working repo at `<dir>/<name>-seed`.
///
/// Returns `(bare_path, seed_path)`. Push more history from the seed with
/// [`push_seed`] to simulate upstream changes.
pub fn bare_upstream(dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    let bare = dir.join(format!("{name}.git"));
    let seed = dir.join(format!("{name}-seed"));
    fs::create_dir_all(&bare).unwrap_or_else(|e| panic!("failed to create {}: {e}", bare.display()));
    git(&bare, &["-c", "init.defaultBranch=main", "init", "--bare"]);
    real_git_repo_with_commit(&seed);
    let bare_str = bare.to_string_lossy().into_owned();
    git(&seed, &["remote", "add", "origin", &bare_str]);
    push_seed(&seed);
    (bare, seed)
}

/// Push `main` and all tags of a seed repository to its origin.
pub fn push_seed(seed: &Path) {
    git(seed, &["push", "-q", "origin", "main"]);
    git(seed, &["push", "-q", "origin", "--tags"]);
}

/// Configure identity in a clone so commits made through it succeed.
pub fn configure_identity(path: &Path) {
    configure(path);
}
