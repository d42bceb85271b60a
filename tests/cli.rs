//! Command-line behavior that needs no network

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn draftpress() -> Command {
    let mut cmd = Command::cargo_bin("draftpress").unwrap();
    cmd.env_remove("DRAFTPRESS_REPO").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    draftpress()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("publish")
                .and(predicate::str::contains("finish"))
                .and(predicate::str::contains("clone"))
                .and(predicate::str::contains("deploy")),
        );
}

#[test]
fn test_site_commands_need_a_repository() {
    draftpress()
        .args(["assets", "--kind", "images"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repository given"));
}

#[test]
fn test_deploy_rejects_missing_site_dir() {
    let bucket = TempDir::new().unwrap();
    draftpress()
        .args(["deploy", "does-not-exist", "--bucket"])
        .arg(bucket.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_deploy_compresses_and_syncs_site() {
    let site = TempDir::new().unwrap();
    fs::write(site.path().join("index.html"), "<h1>Hello</h1>").unwrap();
    fs::create_dir(site.path().join("css")).unwrap();
    fs::write(site.path().join("css/site.css"), "body { margin: 0 }").unwrap();
    fs::write(site.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();

    let bucket = TempDir::new().unwrap();
    fs::create_dir_all(bucket.path().join("preview")).unwrap();
    fs::write(bucket.path().join("preview/old.html"), "stale").unwrap();

    draftpress()
        .arg("deploy")
        .arg(site.path())
        .arg("--bucket")
        .arg(bucket.path())
        .args(["--prefix", "preview"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Uploaded 3 files")
                .and(predicate::str::contains("preview/old.html")),
        );

    let index = fs::read(bucket.path().join("preview/index.html")).unwrap();
    assert_eq!(&index[..2], &[0x1f, 0x8b]);
    let logo = fs::read(bucket.path().join("preview/logo.png")).unwrap();
    assert_eq!(logo, [0x89, b'P', b'N', b'G']);
    assert!(!bucket.path().join("preview/old.html").exists());
}
