use convoy_operations::{BulkOutcome, BulkReport, ChangeInfo, PublishOutcome, PublishReport};

pub(crate) fn print_releases(changes: &[ChangeInfo]) {
    for info in changes {
        println!(
            "  {} {} -> {} ({})",
            info.name, info.current_version, info.new_version, info.change
        );
    }
}

pub(crate) fn print_publish_outcome(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::NoChanges => {
            println!("No pending change requests resolve to a release.");
        }
        PublishOutcome::DryRun(report) => {
            println!("Dry run - no changes will be made.\n");
            print_publish_report(report);
        }
        PublishOutcome::Completed(report) => {
            print_publish_report(report);
            if report.publish_failures.is_empty() {
                println!("\nRelease complete.");
            } else {
                println!("\nRelease completed with publish failures.");
            }
        }
    }
}

fn print_publish_report(report: &PublishReport) {
    println!("Planned releases:");
    print_releases(&report.releases);

    if !report.unknown_packages.is_empty() {
        println!("\nRequests for unknown packages (skipped):");
        for name in &report.unknown_packages {
            println!("  {name}");
        }
    }

    if !report.would_publish.is_empty() {
        println!("\nWould publish:");
        for command in &report.would_publish {
            println!("  {command}");
        }
    }

    if !report.published.is_empty() {
        println!("\nPublished:");
        for name in &report.published {
            println!("  {name}");
        }
    }

    for (name, error) in &report.publish_failures {
        println!("\nFailed to publish {name}: {error}");
    }

    if !report.tags.is_empty() {
        println!("\nTags:");
        for tag in &report.tags {
            println!("  {tag}");
        }
    }

    if let Some(sha) = &report.commit_sha {
        println!("\nRelease commit: {sha}");
    }
}

pub(crate) fn print_bulk_outcome(outcome: &BulkOutcome) {
    match outcome {
        BulkOutcome::DryRun(report) => {
            println!("Dry run - no packages will be published.\n");
            print_bulk_report(report);
        }
        BulkOutcome::Completed(report) => {
            print_bulk_report(report);
            if report.publish_failures.is_empty() {
                println!("\nBulk publish complete.");
            } else {
                println!("\nBulk publish completed with failures.");
            }
        }
    }
}

fn print_bulk_report(report: &BulkReport) {
    if !report.published.is_empty() {
        println!("Published:");
        for name in &report.published {
            println!("  {name}");
        }
    }

    for name in &report.skipped {
        println!("  {name}: skip, not updated");
    }

    for (name, error) in &report.publish_failures {
        println!("Failed to publish {name}: {error}");
    }

    if !report.tags.is_empty() {
        println!("\nTags:");
        for tag in &report.tags {
            println!("  {tag}");
        }
    }
}
