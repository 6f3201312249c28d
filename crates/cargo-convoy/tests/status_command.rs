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
    write_file(
        &dir.path().join("crates/plugin-a/Cargo.toml"),
        "[package]\nname = \"plugin-a\"\nversion = \"2.3.0\"\nedition = \"2021\"\n\n[dependencies]\ncore = { path = \"../core\", version = \"^1.0.0\" }\n",
    );
    write_file(&dir.path().join("crates/plugin-a/src/lib.rs"), "");
    dir
}

#[test]
fn empty_change_dir_reports_nothing_pending() {
    let dir = scaffold_workspace();

    bin()
        .arg("status")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending change requests."));
}

#[test]
fn status_shows_cascade_including_dependency_bump() {
    let dir = scaffold_workspace();
    write_file(
        &dir.path().join(".changes/core-major.md"),
        "---\npackage: core\nchange: major\n---\nRemove the deprecated v1 API.\n",
    );

    bin()
        .arg("status")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("core 1.0.0 -> 2.0.0 (major)"))
        .stdout(predicate::str::contains(
            "plugin-a 2.3.0 -> 2.3.0 (dependency)",
        ));
}

#[test]
fn status_lists_unknown_package_requests() {
    let dir = scaffold_workspace();
    write_file(
        &dir.path().join(".changes/ghost.md"),
        "---\npackage: ghost\nchange: patch\n---\nNo such package.\n",
    );
    write_file(
        &dir.path().join(".changes/core-patch.md"),
        "---\npackage: core\nchange: patch\n---\nFix panic.\n",
    );

    bin()
        .arg("status")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown packages"))
        .stdout(predicate::str::contains("ghost"));
}

#[test]
fn status_does_not_mutate_anything() {
    let dir = scaffold_workspace();
    write_file(
        &dir.path().join(".changes/core-major.md"),
        "---\npackage: core\nchange: major\n---\nBreaking.\n",
    );

    bin()
        .arg("status")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join(".changes/core-major.md").exists());
    let manifest =
        fs::read_to_string(dir.path().join("crates/core/Cargo.toml")).expect("read manifest");
    assert!(manifest.contains("version = \"1.0.0\""));
}
