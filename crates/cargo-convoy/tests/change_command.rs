use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bin() -> Command {
    Command::cargo_bin("cargo-convoy").expect("binary builds")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write file");
}

fn scaffold_workspace() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    write_file(
        &dir.path().join("Cargo.toml"),
        "[workspace]\nmembers = [\"crates/*\"]\nresolver = \"2\"\n",
    );
    write_file(
        &dir.path().join("crates/core/Cargo.toml"),
        "[package]\nname = \"core\"\nversion = \"1.0.0\"\nedition = \"2021\"\n",
    );
    write_file(&dir.path().join("crates/core/src/lib.rs"), "");
    dir
}

#[test]
fn records_a_change_request_file() {
    let dir = scaffold_workspace();

    bin()
        .args([
            "change",
            "--package",
            "core",
            "--change",
            "minor",
            "--message",
            "Add streaming support",
        ])
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded minor change for 'core'"));

    let change_dir = dir.path().join(".changes");
    let files: Vec<_> = fs::read_dir(&change_dir)
        .expect("change dir exists")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(files.len(), 1);

    let content = fs::read_to_string(&files[0]).expect("read change file");
    assert!(content.contains("package: core"));
    assert!(content.contains("change: minor"));
    assert!(content.contains("Add streaming support"));
}

#[test]
fn change_with_commit_metadata() {
    let dir = scaffold_workspace();

    bin()
        .args([
            "change",
            "--package",
            "core",
            "--change",
            "patch",
            "--message",
            "Fix panic on empty input",
            "--author",
            "jane@example.com",
            "--commit",
            "4f2a91c",
        ])
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success();

    let change_dir = dir.path().join(".changes");
    let file = fs::read_dir(&change_dir)
        .expect("change dir exists")
        .next()
        .expect("one file")
        .expect("entry")
        .path();
    let content = fs::read_to_string(file).expect("read change file");
    assert!(content.contains("author: jane@example.com"));
    assert!(content.contains("commit: 4f2a91c"));
}

#[test]
fn unknown_package_is_rejected() {
    let dir = scaffold_workspace();

    bin()
        .args([
            "change",
            "--package",
            "ghost",
            "--change",
            "major",
            "--message",
            "No such package",
        ])
        .arg("-C")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown package 'ghost'"));

    assert!(!dir.path().join(".changes").exists());
}

#[test]
fn invalid_change_type_is_rejected_by_clap() {
    let dir = scaffold_workspace();

    bin()
        .args([
            "change",
            "--package",
            "core",
            "--change",
            "gigantic",
            "--message",
            "nope",
        ])
        .arg("-C")
        .arg(dir.path())
        .assert()
        .failure();
}
