use std::fs;
use std::path::Path;
use std::process::Command as ProcessCommand;

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

fn git(dir: &Path, args: &[&str]) {
    let status = ProcessCommand::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn scaffold_git_workspace() -> TempDir {
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
    write_file(
        &dir.path().join(".changes/core-minor.md"),
        "---\npackage: core\nchange: minor\n---\nAdd streaming support.\n",
    );

    git(dir.path(), &["init", "--initial-branch=main"]);
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "Initial commit"]);

    dir
}

#[test]
fn publish_without_apply_is_a_dry_run() {
    let dir = scaffold_git_workspace();

    bin()
        .arg("publish")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("core 1.0.0 -> 1.1.0 (minor)"));

    // Nothing moved: manifest, change request, changelog, branch.
    let manifest =
        fs::read_to_string(dir.path().join("crates/core/Cargo.toml")).expect("read manifest");
    assert!(manifest.contains("version = \"1.0.0\""));
    assert!(dir.path().join(".changes/core-minor.md").exists());
    assert!(!dir.path().join("crates/core/CHANGELOG.toml").exists());
}

#[test]
fn publish_with_no_requests_reports_no_changes() {
    let dir = scaffold_git_workspace();
    fs::remove_file(dir.path().join(".changes/core-minor.md")).expect("remove request");
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "Drop request"]);

    bin()
        .arg("publish")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No pending change requests resolve to a release.",
        ));
}

#[test]
fn apply_on_dirty_tree_fails_with_nonzero_exit() {
    let dir = scaffold_git_workspace();
    write_file(&dir.path().join("scratch.txt"), "uncommitted");

    bin()
        .args(["publish", "--apply"])
        .arg("-C")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("uncommitted changes"));
}

#[test]
fn apply_on_wrong_branch_fails_before_mutation() {
    let dir = scaffold_git_workspace();
    git(dir.path(), &["checkout", "-b", "feature"]);

    bin()
        .args(["publish", "--apply"])
        .arg("-C")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("target branch is 'main'"));

    assert!(dir.path().join(".changes/core-minor.md").exists());
}
