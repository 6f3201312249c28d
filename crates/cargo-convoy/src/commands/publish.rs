use std::path::Path;

use convoy_core::PrereleaseToken;
use convoy_operations::providers::{
    CargoRegistry, FileSystemChangeStore, FileSystemChangelogStore, GitSourceControl,
    TomlManifestStore, WorkspaceProjectProvider,
};
use convoy_operations::traits::ProjectProvider;
use convoy_operations::{
    BulkOutcome, BulkPublisher, PublishInput, PublishOrchestrator, PublishOutcome,
};
use convoy_project::Project;

use super::PublishArgs;
use crate::error::{CliError, Result};
use crate::output;

pub(crate) fn run(args: PublishArgs, start_path: &Path) -> Result<()> {
    let project = WorkspaceProjectProvider::new().discover(start_path)?;

    // Mutual exclusion is rejected before anything is loaded.
    let prerelease = PrereleaseToken::resolve(args.prerelease_name, args.suffix)?;

    let input = PublishInput {
        apply: args.apply,
        publish: args.publish,
        target_branch: args.target_branch,
        registry_url: args.registry,
        token: args.token,
        dist_tag: args.tag,
        force: args.force,
        include_commit_details: args.add_commit_details,
        prerelease,
        version_policy: args.version_policy,
    };

    if args.regenerate_changelogs {
        let orchestrator = build_orchestrator(&project)?;
        let count = orchestrator.regenerate_changelogs(&project)?;
        println!("Regenerated changelogs for {count} package(s).");
        return Ok(());
    }

    if args.include_all {
        let bulk = BulkPublisher::new(
            GitSourceControl::open(&project.root, project.config.remote())?,
            CargoRegistry::new(),
        );
        let outcome = bulk.run(&project, &input)?;
        output::print_bulk_outcome(&outcome);

        if let BulkOutcome::Completed(report) = &outcome {
            if !report.publish_failures.is_empty() {
                return Err(CliError::PublishFailures {
                    count: report.publish_failures.len(),
                });
            }
        }
        return Ok(());
    }

    let orchestrator = build_orchestrator(&project)?;
    let outcome = orchestrator.run(&project, &input)?;
    output::print_publish_outcome(&outcome);

    if let PublishOutcome::Completed(report) = &outcome {
        if !report.publish_failures.is_empty() {
            return Err(CliError::PublishFailures {
                count: report.publish_failures.len(),
            });
        }
    }
    Ok(())
}

fn build_orchestrator(
    project: &Project,
) -> Result<
    PublishOrchestrator<
        GitSourceControl,
        CargoRegistry,
        TomlManifestStore,
        FileSystemChangelogStore,
        FileSystemChangeStore,
    >,
> {
    Ok(PublishOrchestrator::new(
        GitSourceControl::open(&project.root, project.config.remote())?,
        CargoRegistry::new(),
        TomlManifestStore::new(),
        FileSystemChangelogStore::new(),
        FileSystemChangeStore::new(project.change_dir()),
    ))
}
