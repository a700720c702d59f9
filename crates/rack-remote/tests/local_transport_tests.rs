//! LocalTransport behaviour against a temp directory

#![cfg(unix)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use rack_remote::{Error, LocalTransport, RemoteCommand, Timeouts, Transport};
use tempfile::TempDir;

fn transport() -> LocalTransport {
    LocalTransport::new(Timeouts::from_secs(10, 1))
}

#[test]
fn write_then_read_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom/rackpluginhashes.yaml");
    let path = path.to_str().unwrap();

    transport().write_file(path, b"hashes: []\n").unwrap();

    assert_eq!(
        transport().read_file(path).unwrap(),
        Some(b"hashes: []\n".to_vec())
    );
}

#[test]
fn reading_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.yaml");
    assert_eq!(transport().read_file(path.to_str().unwrap()).unwrap(), None);
}

#[test]
fn list_dirs_skips_files() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("Foo")).unwrap();
    std::fs::create_dir(dir.path().join("Baz")).unwrap();
    std::fs::write(dir.path().join("README"), "x").unwrap();

    let mut names = transport().list_dirs(dir.path().to_str().unwrap()).unwrap();
    names.sort();
    assert_eq!(names, vec!["Baz".to_string(), "Foo".to_string()]);
}

#[test]
fn list_dirs_of_missing_or_empty_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("plugins");
    assert!(transport().list_dirs(missing.to_str().unwrap()).unwrap().is_empty());
    std::fs::create_dir(&missing).unwrap();
    assert!(transport().list_dirs(missing.to_str().unwrap()).unwrap().is_empty());
}

#[test]
fn failing_command_reports_label_and_stderr() {
    let err = transport()
        .run(&RemoteCommand::redacted("echo boom >&2; exit 2", "failing step"))
        .unwrap_err();
    match err {
        Error::CommandFailed {
            command,
            exit_code,
            stderr,
        } => {
            assert_eq!(command, "failing step");
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn slow_command_times_out() {
    let transport = LocalTransport::new(Timeouts {
        command: Duration::from_millis(200),
        connect: Duration::from_secs(1),
    });
    let err = transport.run(&RemoteCommand::new("sleep 3")).unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
    assert!(err.is_connection());
}

#[test]
fn connection_check_succeeds_locally() {
    transport().check_connection().unwrap();
}
