use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rack_fs::ResourceLayout;

#[test]
fn test_layout_paths() {
    let layout = ResourceLayout::new("/opt/rack");

    assert_eq!(layout.repos_dir(), std::path::PathBuf::from("/opt/rack/repos"));
    assert_eq!(
        layout.master_repo_dir(),
        std::path::PathBuf::from("/opt/rack/repos/master")
    );
    assert_eq!(
        layout.repo_dir("custom"),
        std::path::PathBuf::from("/opt/rack/repos/custom")
    );
    assert_eq!(
        layout.config_path(),
        std::path::PathBuf::from("/opt/rack/config.yaml")
    );
    assert_eq!(
        layout.shop_store_path(),
        std::path::PathBuf::from("/opt/rack/shopstore.yaml")
    );
}

#[test]
fn test_ensure_creates_repos_dir() {
    let temp = TempDir::new().unwrap();
    let layout = ResourceLayout::new(temp.path().join("rackresource"));

    layout.ensure().unwrap();
    layout.ensure().unwrap();

    temp.child("rackresource/repos")
        .assert(predicate::path::is_dir());
}
