use std::fs;
use std::path::Path;

use convoy_operations::providers::{
    CargoRegistry, FileSystemChangeStore, FileSystemChangelogStore, GitSourceControl,
    TomlManifestStore, WorkspaceProjectProvider,
};
use convoy_operations::traits::ProjectProvider;
use convoy_operations::{OperationError, PublishInput, PublishOrchestrator, PublishOutcome};
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write file");
}

/// A two-package workspace with one pending major change request for
/// `core`, committed on `main` and pushed to a local bare remote.
fn scaffold_released_workspace() -> (TempDir, TempDir) {
    let dir = TempDir::new().expect("create temp dir");

    write_file(
        &dir.path().join("Cargo.toml"),
        r#"[workspace]
members = ["crates/*"]
resolver = "2"
"#,
    );
    write_file(
        &dir.path().join("crates/core/Cargo.toml"),
        r#"[package]
name = "core"
version = "1.0.0"
edition = "2021"
"#,
    );
    write_file(&dir.path().join("crates/core/src/lib.rs"), "");
    write_file(
        &dir.path().join("crates/plugin-a/Cargo.toml"),
        r#"[package]
name = "plugin-a"
version = "2.3.0"
edition = "2021"

[dependencies]
core = { path = "../core", version = "^1.0.0" }
"#,
    );
    write_file(&dir.path().join("crates/plugin-a/src/lib.rs"), "");
    write_file(
        &dir.path().join(".changes/brave-calm-otter.md"),
        r"---
package: core
change: major
author: jane@example.com
commit: 4f2a91c
---
Remove the deprecated v1 API.
",
    );

    let remote_dir = TempDir::new().expect("create remote dir");
    git2::Repository::init_bare(remote_dir.path()).expect("init bare");

    let mut init_options = git2::RepositoryInitOptions::new();
    init_options.initial_head("main");
    let repo = git2::Repository::init_opts(dir.path(), &init_options).expect("git init");
    let mut config = repo.config().expect("git config");
    config.set_str("user.name", "Test").expect("set user.name");
    config
        .set_str("user.email", "test@example.com")
        .expect("set user.email");
    drop(config);
    let url = remote_dir.path().to_str().expect("utf8 path").to_string();
    repo.remote("origin", &url).expect("add remote");
    drop(repo);

    let git = convoy_git::Repository::open(dir.path()).expect("open repo");
    git.stage_all().expect("stage");
    git.commit("Initial commit").expect("commit");
    git.push_branch("origin", "main").expect("push main");

    (dir, remote_dir)
}

fn orchestrator(
    workspace: &Path,
    publish_program: &str,
) -> PublishOrchestrator<
    GitSourceControl,
    CargoRegistry,
    TomlManifestStore,
    FileSystemChangelogStore,
    FileSystemChangeStore,
> {
    PublishOrchestrator::new(
        GitSourceControl::open(workspace, "origin").expect("open source control"),
        CargoRegistry::with_program(publish_program),
        TomlManifestStore::new(),
        FileSystemChangelogStore::new(),
        FileSystemChangeStore::new(workspace.join(".changes")),
    )
}

fn discover(workspace: &Path) -> convoy_project::Project {
    WorkspaceProjectProvider::new()
        .discover(workspace)
        .expect("discover project")
}

#[test]
fn dry_run_reports_and_leaves_everything_untouched() {
    let (dir, _remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "true");

    let outcome = orch
        .run(&project, &PublishInput::default())
        .expect("dry run");

    let PublishOutcome::DryRun(report) = outcome else {
        panic!("expected dry run outcome");
    };
    assert_eq!(report.releases.len(), 2);

    let core_manifest =
        fs::read_to_string(dir.path().join("crates/core/Cargo.toml")).expect("read manifest");
    assert!(core_manifest.contains("version = \"1.0.0\""), "no edit");
    assert!(
        dir.path().join(".changes/brave-calm-otter.md").exists(),
        "request kept"
    );
    assert!(
        !dir.path().join("crates/core/CHANGELOG.toml").exists(),
        "no changelog"
    );

    let git = convoy_git::Repository::open(dir.path()).expect("open repo");
    assert!(git.is_working_tree_clean().expect("status"));
    assert_eq!(git.current_branch().expect("branch"), "main");
}

#[cfg(unix)]
#[test]
fn full_release_applies_publishes_tags_and_merges() {
    let (dir, remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "true");

    let input = PublishInput {
        apply: true,
        publish: true,
        ..PublishInput::default()
    };
    let outcome = orch.run(&project, &input).expect("full run");
    let PublishOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome");
    };

    assert_eq!(report.published, vec!["core"]);
    assert_eq!(report.tags, vec!["core-v2.0.0"]);
    assert!(report.publish_failures.is_empty());

    // Manifest edits landed: core bumped, plugin-a range refreshed but
    // its own version unchanged.
    let core_manifest =
        fs::read_to_string(dir.path().join("crates/core/Cargo.toml")).expect("read core");
    assert!(core_manifest.contains("version = \"2.0.0\""));
    let plugin_manifest =
        fs::read_to_string(dir.path().join("crates/plugin-a/Cargo.toml")).expect("read plugin");
    assert!(plugin_manifest.contains("version = \"2.3.0\""));
    assert!(plugin_manifest.contains("version = \"^2.0.0\""));

    // The applied change request was consumed and changelogs written.
    assert!(!dir.path().join(".changes/brave-calm-otter.md").exists());
    let changelog =
        fs::read_to_string(dir.path().join("crates/core/CHANGELOG.md")).expect("read changelog");
    assert!(changelog.contains("## 2.0.0"));
    assert!(changelog.contains("Remove the deprecated v1 API."));

    // Everything merged back to the target branch and reached the
    // remote; the temp branch is gone.
    let git = convoy_git::Repository::open(dir.path()).expect("open repo");
    assert_eq!(git.current_branch().expect("branch"), "main");
    assert!(git.is_working_tree_clean().expect("status"));

    let bare = git2::Repository::open_bare(remote.path()).expect("open bare");
    assert!(bare.find_reference("refs/tags/core-v2.0.0").is_ok());
    assert!(
        bare.find_reference("refs/tags/plugin-a-v2.3.0").is_err(),
        "dependency-only bump is not tagged"
    );
    let remote_main = bare
        .find_reference("refs/heads/main")
        .expect("remote main")
        .peel_to_commit()
        .expect("commit");
    let local_main = git2::Repository::open(dir.path())
        .expect("open")
        .find_reference("refs/heads/main")
        .expect("local main")
        .peel_to_commit()
        .expect("commit");
    assert_eq!(remote_main.id(), local_main.id());

    let temp_branch = report.temp_branch.expect("temp branch name");
    assert!(
        git.checkout_branch(&temp_branch).is_err(),
        "temp branch deleted after merge"
    );
}

#[cfg(unix)]
#[test]
fn failed_publish_reports_failure_but_completes_workflow() {
    let (dir, _remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "false");

    let input = PublishInput {
        apply: true,
        publish: true,
        ..PublishInput::default()
    };
    let outcome = orch.run(&project, &input).expect("run completes");
    let PublishOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome");
    };

    assert_eq!(report.publish_failures.len(), 1);
    assert!(report.published.is_empty());
    assert!(report.tags.is_empty());

    // The branch workflow still completed.
    let git = convoy_git::Repository::open(dir.path()).expect("open repo");
    assert_eq!(git.current_branch().expect("branch"), "main");
}

#[test]
fn dirty_tree_aborts_before_mutation() {
    let (dir, _remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    write_file(&dir.path().join("scratch.txt"), "uncommitted");
    let orch = orchestrator(dir.path(), "true");

    let input = PublishInput {
        apply: true,
        publish: false,
        ..PublishInput::default()
    };
    let err = orch.run(&project, &input).expect_err("dirty tree");

    assert!(matches!(err, OperationError::DirtyWorkingTree));

    let core_manifest =
        fs::read_to_string(dir.path().join("crates/core/Cargo.toml")).expect("read manifest");
    assert!(core_manifest.contains("version = \"1.0.0\""));
}

#[test]
fn change_store_survives_unknown_package_requests() {
    let (dir, _remote) = scaffold_released_workspace();
    write_file(
        &dir.path().join(".changes/ghost.md"),
        "---\npackage: ghost\nchange: major\n---\nNo such package.\n",
    );
    let git = convoy_git::Repository::open(dir.path()).expect("open repo");
    git.stage_all().expect("stage");
    git.commit("add ghost request").expect("commit");

    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "true");

    let input = PublishInput {
        apply: true,
        publish: false,
        ..PublishInput::default()
    };
    let outcome = orch.run(&project, &input).expect("run");
    let PublishOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome");
    };

    assert_eq!(report.unknown_packages, vec!["ghost"]);
    assert!(
        dir.path().join(".changes/ghost.md").exists(),
        "unknown-package request left in place"
    );
    assert!(!dir.path().join(".changes/brave-calm-otter.md").exists());
}

#[test]
fn apply_only_run_does_not_require_a_registry() {
    let (dir, remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    // A broken publish program must not matter without --publish.
    let orch = orchestrator(dir.path(), "definitely-not-a-real-binary");

    let input = PublishInput {
        apply: true,
        publish: false,
        ..PublishInput::default()
    };
    let outcome = orch.run(&project, &input).expect("run");
    let PublishOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome");
    };

    assert!(report.published.is_empty());
    assert!(report.tags.is_empty());

    let bare = git2::Repository::open_bare(remote.path()).expect("open bare");
    assert!(
        bare.find_reference("refs/tags/core-v2.0.0").is_err(),
        "no tags without publish"
    );
    assert!(bare.find_reference("refs/heads/main").is_ok());
}

#[test]
fn second_run_after_release_reports_no_changes() {
    let (dir, _remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "true");

    let input = PublishInput {
        apply: true,
        publish: false,
        ..PublishInput::default()
    };
    orch.run(&project, &input).expect("first run");

    // Re-discover: versions moved on disk.
    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "true");
    let outcome = orch.run(&project, &input).expect("second run");

    assert!(matches!(outcome, PublishOutcome::NoChanges));
}

#[test]
fn regenerate_changelogs_rebuilds_markdown() {
    let (dir, _remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    let orch = orchestrator(dir.path(), "true");

    let input = PublishInput {
        apply: true,
        publish: false,
        ..PublishInput::default()
    };
    orch.run(&project, &input).expect("release");

    let markdown_path = dir.path().join("crates/core/CHANGELOG.md");
    fs::remove_file(&markdown_path).expect("remove markdown");

    let orch = orchestrator(dir.path(), "true");
    orch.regenerate_changelogs(&project).expect("regenerate");

    let markdown = fs::read_to_string(&markdown_path).expect("read regenerated");
    assert!(markdown.contains("## 2.0.0"));
}

#[cfg(unix)]
#[test]
fn bulk_helpers_exist_for_include_all() {
    // Bulk mode is covered by unit tests against mocks; this only
    // checks the provider wiring compiles against a real project.
    let (dir, _remote) = scaffold_released_workspace();
    let project = discover(dir.path());
    let bulk = convoy_operations::BulkPublisher::new(
        GitSourceControl::open(dir.path(), "origin").expect("open source control"),
        CargoRegistry::with_program("true"),
    );

    let input = PublishInput::default();
    let outcome = bulk.run(&project, &input).expect("bulk dry run");
    assert!(matches!(outcome, convoy_operations::BulkOutcome::DryRun(_)));
}
