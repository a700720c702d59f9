//! Reading tag hashes from a local upstream

use pretty_assertions::assert_eq;
use rack_git::{Error, GitClient};
use rack_test_utils::git::{annotated_tag, commit_file, real_git_repo_with_commit, tag};
use tempfile::TempDir;

#[test]
fn lightweight_tag_resolves_to_commit() {
    let dir = TempDir::new().unwrap();
    real_git_repo_with_commit(dir.path());
    let commit = tag(dir.path(), "1.0.0");

    let hash = GitClient::anonymous()
        .latest_tag_hash(dir.path().to_str().unwrap(), "1.0.0")
        .unwrap();

    assert_eq!(hash, commit);
}

#[test]
fn annotated_tag_resolves_to_peeled_commit() {
    let dir = TempDir::new().unwrap();
    real_git_repo_with_commit(dir.path());
    commit_file(dir.path(), "src/lib.php", "<?php\n", "code");
    let commit = annotated_tag(dir.path(), "2.1.0", "release 2.1.0");

    let hash = GitClient::anonymous()
        .latest_tag_hash(dir.path().to_str().unwrap(), "2.1.0")
        .unwrap();

    assert_eq!(hash, commit);
}

#[test]
fn moved_tag_changes_hash() {
    let dir = TempDir::new().unwrap();
    real_git_repo_with_commit(dir.path());
    let first = tag(dir.path(), "1.0.0");
    commit_file(dir.path(), "fix.txt", "fix", "hotfix");
    rack_test_utils::git::git(dir.path(), &["tag", "-f", "1.0.0"]);

    let hash = GitClient::anonymous()
        .latest_tag_hash(dir.path().to_str().unwrap(), "1.0.0")
        .unwrap();

    assert_ne!(hash, first);
}

#[test]
fn missing_tag_is_reported() {
    let dir = TempDir::new().unwrap();
    real_git_repo_with_commit(dir.path());

    let err = GitClient::anonymous()
        .latest_tag_hash(dir.path().to_str().unwrap(), "9.9.9")
        .unwrap_err();

    assert!(matches!(err, Error::TagNotFound { ref tag, .. } if tag == "9.9.9"));
}

#[test]
fn advertised_refs_carry_object_ids() {
    let dir = TempDir::new().unwrap();
    real_git_repo_with_commit(dir.path());
    let commit = tag(dir.path(), "1.0.0");

    let refs = rack_git::tags::list_remote_refs(dir.path().to_str().unwrap(), None).unwrap();

    let tagged = refs.iter().find(|r| r.name == "refs/tags/1.0.0").unwrap();
    assert_eq!(tagged.oid, commit);
    assert_eq!(tagged.oid.len(), 40);
}
