//! Cloning, updating, and publishing through local upstreams

use pretty_assertions::assert_eq;
use rack_git::{Error, GitClient, MirrorStatus, publish};
use rack_test_utils::git::{bare_upstream, commit_file, configure_identity, git, head_commit, push_seed};
use tempfile::TempDir;

#[test]
fn mirror_clones_when_absent() {
    let dir = TempDir::new().unwrap();
    let (bare, _seed) = bare_upstream(dir.path(), "catalog");
    let dest = dir.path().join("repos/master");

    let status = GitClient::anonymous()
        .mirror(bare.to_str().unwrap(), &dest)
        .unwrap();

    assert_eq!(status, MirrorStatus::Cloned);
    assert!(dest.join("README.md").exists());
}

#[test]
fn mirror_fast_forwards_existing_clone() {
    let dir = TempDir::new().unwrap();
    let (bare, seed) = bare_upstream(dir.path(), "catalog");
    let dest = dir.path().join("mirror");
    let client = GitClient::anonymous();
    client.mirror(bare.to_str().unwrap(), &dest).unwrap();

    let before = head_commit(&dest);
    let after = commit_file(&seed, "Foo/1.0.0/Foo_rackspec.yaml", "name: Foo\n", "add Foo");
    push_seed(&seed);

    let status = client.mirror(bare.to_str().unwrap(), &dest).unwrap();
    assert_eq!(status, MirrorStatus::Updated { from: before, to: after.clone() });
    assert_eq!(head_commit(&dest), after);
    assert!(dest.join("Foo/1.0.0/Foo_rackspec.yaml").exists());
}

#[test]
fn update_without_upstream_changes_is_up_to_date() {
    let dir = TempDir::new().unwrap();
    let (bare, _seed) = bare_upstream(dir.path(), "catalog");
    let dest = dir.path().join("mirror");
    let client = GitClient::anonymous();
    client.clone_repo(bare.to_str().unwrap(), &dest).unwrap();

    assert_eq!(client.update(&dest).unwrap(), MirrorStatus::AlreadyUpToDate);
}

#[test]
fn remote_url_reports_origin() {
    let dir = TempDir::new().unwrap();
    let (bare, _seed) = bare_upstream(dir.path(), "catalog");
    let dest = dir.path().join("mirror");
    let client = GitClient::anonymous();
    client.clone_repo(bare.to_str().unwrap(), &dest).unwrap();

    assert_eq!(client.remote_url(&dest).unwrap(), bare.to_str().unwrap());
}

#[test]
fn clone_of_missing_upstream_fails_and_leaves_nothing() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("mirror");
    let missing = dir.path().join("nope.git");

    let err = GitClient::anonymous()
        .clone_repo(missing.to_str().unwrap(), &dest)
        .unwrap_err();

    assert!(matches!(err, Error::Git(_)));
    assert!(!dest.exists());
}

#[test]
fn update_of_plain_directory_is_not_a_repository() {
    let dir = TempDir::new().unwrap();
    let err = GitClient::anonymous().update(dir.path()).unwrap_err();
    assert!(matches!(err, Error::NotARepository { .. }));
}

#[test]
fn commit_and_push_reach_upstream() {
    let dir = TempDir::new().unwrap();
    let (bare, _seed) = bare_upstream(dir.path(), "catalog");
    let dest = dir.path().join("mirror");
    let client = GitClient::anonymous();
    client.clone_repo(bare.to_str().unwrap(), &dest).unwrap();
    configure_identity(&dest);

    std::fs::create_dir_all(dest.join("Bar/2.0.0")).unwrap();
    std::fs::write(dest.join("Bar/2.0.0/Bar_rackspec.yaml"), "name: Bar\n").unwrap();
    let oid = publish::commit_all(&dest, "Bar/2.0.0", "Add Bar_rackspec.yaml for Version 2.0.0 to repo").unwrap();
    client.push(&dest).unwrap();

    assert_eq!(git(&bare, &["rev-parse", "main"]), oid.to_string());
    assert_eq!(
        git(&bare, &["log", "-1", "--format=%s", "main"]),
        "Add Bar_rackspec.yaml for Version 2.0.0 to repo"
    );
}

#[test]
fn reset_hard_drops_unpushed_commit() {
    let dir = TempDir::new().unwrap();
    let (bare, _seed) = bare_upstream(dir.path(), "catalog");
    let dest = dir.path().join("mirror");
    GitClient::anonymous().clone_repo(bare.to_str().unwrap(), &dest).unwrap();
    configure_identity(&dest);

    let before = publish::head_commit(&dest).unwrap().unwrap();
    std::fs::create_dir_all(dest.join("Baz/1.0.0")).unwrap();
    std::fs::write(dest.join("Baz/1.0.0/Baz_rackspec.yaml"), "name: Baz\n").unwrap();
    let added = publish::commit_all(&dest, "Baz/1.0.0", "Add Baz").unwrap();
    assert_ne!(added, before);

    publish::reset_hard(&dest, before).unwrap();

    assert_eq!(publish::head_commit(&dest).unwrap(), Some(before));
    assert_eq!(head_commit(&dest), before.to_string());
}
