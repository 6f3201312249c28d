use std::fmt;

use chrono::{Local, Utc};
use convoy_project::Project;
use convoy_publish::PublishError;
use tracing::{debug, info, warn};

use crate::planner::ChangeManager;
use crate::traits::{
    ChangeStore, ChangelogStore, ManifestStore, RegistryPublisher, SourceControl,
};
use crate::types::{ChangeInfo, PlannedEdit, PublishInput};
use crate::{OperationError, Result};

/// One transition of the publish state machine. Fatal failures are
/// labeled with the step they occurred in so the temp branch can be
/// inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoadChanges,
    CreateTempBranch,
    ApplyAndCommit,
    PushTemp,
    PublishPackages,
    TagPublished,
    PushTags,
    CheckoutTarget,
    PullTarget,
    MergeTempBranch,
    PushTarget,
    DeleteTempBranch,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoadChanges => "load-changes",
            Self::CreateTempBranch => "create-temp-branch",
            Self::ApplyAndCommit => "apply-and-commit",
            Self::PushTemp => "push-temp",
            Self::PublishPackages => "publish-packages",
            Self::TagPublished => "tag-published",
            Self::PushTags => "push-tags",
            Self::CheckoutTarget => "checkout-target",
            Self::PullTarget => "pull-target",
            Self::MergeTempBranch => "merge-temp-branch",
            Self::PushTarget => "push-target",
            Self::DeleteTempBranch => "delete-temp-branch",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub releases: Vec<ChangeInfo>,
    pub planned_edits: Vec<PlannedEdit>,
    pub unknown_packages: Vec<String>,
    /// Packages whose registry publish succeeded (or was already
    /// present, which counts as published).
    pub published: Vec<String>,
    /// Intended publish command lines, dry runs only.
    pub would_publish: Vec<String>,
    /// Per-package publish failures; non-empty means the run failed
    /// overall even though it completed.
    pub publish_failures: Vec<(String, String)>,
    pub tags: Vec<String>,
    pub temp_branch: Option<String>,
    pub commit_sha: Option<String>,
}

#[derive(Debug)]
pub enum PublishOutcome {
    /// No package has a resolved change; nothing was touched.
    NoChanges,
    DryRun(PublishReport),
    Completed(PublishReport),
}

/// Drives one publish run end to end: change cascade, temp branch,
/// registry publishes in dependency order, tags, merge back. Strictly
/// sequential; each step depends on the side effects of the previous
/// one.
pub struct PublishOrchestrator<SC, RP, MS, CL, ST> {
    source_control: SC,
    registry: RP,
    manifests: MS,
    changelogs: CL,
    change_store: ST,
}

impl<SC, RP, MS, CL, ST> PublishOrchestrator<SC, RP, MS, CL, ST>
where
    SC: SourceControl,
    RP: RegistryPublisher,
    MS: ManifestStore,
    CL: ChangelogStore,
    ST: ChangeStore,
{
    pub fn new(
        source_control: SC,
        registry: RP,
        manifests: MS,
        changelogs: CL,
        change_store: ST,
    ) -> Self {
        Self {
            source_control,
            registry,
            manifests,
            changelogs,
            change_store,
        }
    }

    /// Runs one publish run. Entered only if the cascade is non-empty;
    /// without `apply` this is a pure dry run.
    ///
    /// # Errors
    ///
    /// Returns a precondition error before any mutation, or
    /// [`OperationError::StepFailed`] naming the fatal transition.
    /// Registry publish failures are collected in the report instead.
    pub fn run(&self, project: &Project, input: &PublishInput) -> Result<PublishOutcome> {
        let target_branch = input
            .target_branch
            .clone()
            .unwrap_or_else(|| project.config.target_branch().to_string());

        if input.apply {
            self.check_preconditions(&target_branch)?;
        }

        let manager = self.step(Step::LoadChanges, || {
            ChangeManager::load(
                project,
                &self.change_store,
                input.prerelease.as_ref(),
                input.include_commit_details,
            )
        })?;

        if !manager.has_changes() {
            info!("no pending change requests resolve to a release");
            return Ok(PublishOutcome::NoChanges);
        }

        let today = Local::now().date_naive();

        if !input.apply {
            return Ok(PublishOutcome::DryRun(self.dry_run(&manager, input, today)?));
        }

        self.execute(&manager, input, &target_branch, today)
            .map(PublishOutcome::Completed)
    }

    /// Re-renders every package's changelog markdown from its stored
    /// data without consuming change requests.
    ///
    /// # Errors
    ///
    /// Returns an error if a changelog cannot be read or written.
    pub fn regenerate_changelogs(&self, project: &Project) -> Result<usize> {
        for package in &project.packages {
            self.changelogs.regenerate(package)?;
        }
        Ok(project.packages.len())
    }

    fn check_preconditions(&self, target_branch: &str) -> Result<()> {
        if !self.source_control.is_working_tree_clean()? {
            return Err(OperationError::DirtyWorkingTree);
        }

        let current = self.source_control.current_branch()?;
        if current != target_branch {
            return Err(OperationError::WrongBranch {
                current,
                expected: target_branch.to_string(),
            });
        }

        Ok(())
    }

    fn dry_run(
        &self,
        manager: &ChangeManager,
        input: &PublishInput,
        today: chrono::NaiveDate,
    ) -> Result<PublishReport> {
        let planned_edits = manager.apply(&self.manifests, false)?;
        manager.update_changelogs(&self.changelogs, false, today)?;
        manager.consume_requests(&self.change_store, false)?;

        let mut report = PublishReport {
            releases: manager.changes().to_vec(),
            planned_edits,
            unknown_packages: manager.unknown_packages().to_vec(),
            ..PublishReport::default()
        };

        if input.publish {
            let options = input.publish_options(true);
            for info in manager.changes().iter().filter(|c| c.requires_publish()) {
                let Some(package) = manager.package(&info.name) else {
                    continue;
                };
                if !package.publish {
                    continue;
                }
                let probe = self.registry.publish(package, &options)?;
                report.would_publish.push(probe.command_line);
            }
        }

        Ok(report)
    }

    fn execute(
        &self,
        manager: &ChangeManager,
        input: &PublishInput,
        target_branch: &str,
        today: chrono::NaiveDate,
    ) -> Result<PublishReport> {
        let temp_branch = format!("convoy-publish-{}", Utc::now().format("%Y%m%d%H%M%S"));

        // Atomicity boundary: everything below mutates the temp branch
        // only, so a fatal failure leaves the target branch untouched.
        self.step(Step::CreateTempBranch, || {
            self.source_control.create_branch(&temp_branch)
        })?;

        let mut report = PublishReport {
            releases: manager.changes().to_vec(),
            unknown_packages: manager.unknown_packages().to_vec(),
            temp_branch: Some(temp_branch.clone()),
            ..PublishReport::default()
        };

        let (edits, sha) = self.step(Step::ApplyAndCommit, || {
            let edits = manager.apply(&self.manifests, true)?;
            manager.update_changelogs(&self.changelogs, true, today)?;
            manager.consume_requests(&self.change_store, true)?;
            self.source_control.stage_all()?;
            let sha = self
                .source_control
                .commit(&commit_message(manager.changes()))?;
            Ok((edits, sha))
        })?;
        report.planned_edits = edits;
        report.commit_sha = Some(sha);

        self.step(Step::PushTemp, || {
            self.source_control.push_branch(&temp_branch)
        })?;

        if input.publish {
            self.publish_each(manager, input, &mut report);
        }

        if input.publish && input.should_tag() {
            report.tags = self.step(Step::TagPublished, || {
                let mut tags = Vec::new();
                for name in &report.published {
                    let Some(package) = manager.package(name) else {
                        continue;
                    };
                    if !package.publish {
                        continue;
                    }
                    let Some(info) = manager.change(name) else {
                        continue;
                    };

                    let tag = format!("{name}-v{}", info.new_version);
                    self.source_control
                        .create_tag(&tag, &format!("Release {name} {}", info.new_version))?;
                    tags.push(tag);
                }
                Ok(tags)
            })?;

            if !report.tags.is_empty() {
                self.step(Step::PushTags, || self.source_control.push_tags())?;
            }
        }

        self.step(Step::CheckoutTarget, || {
            self.source_control.checkout(target_branch)
        })?;
        self.step(Step::PullTarget, || self.source_control.pull(target_branch))?;
        self.step(Step::MergeTempBranch, || {
            self.source_control.merge_branch(&temp_branch)
        })?;
        // A failure from here on leaves the repository behind the
        // registry: published artifacts are not rolled back, and the
        // step name in the error tells the operator where to look.
        self.step(Step::PushTarget, || {
            self.source_control.push_branch(target_branch)
        })?;

        if let Err(e) = self.source_control.delete_branch(&temp_branch) {
            warn!(branch = %temp_branch, error = %e, "failed to delete temp branch");
        }

        Ok(report)
    }

    /// Publishes in cascade order. One failure does not stop the
    /// remaining packages, but marks the run failed; an
    /// already-present version counts as published.
    fn publish_each(
        &self,
        manager: &ChangeManager,
        input: &PublishInput,
        report: &mut PublishReport,
    ) {
        let options = input.publish_options(false);

        for info in manager.changes().iter().filter(|c| c.requires_publish()) {
            let Some(package) = manager.package(&info.name) else {
                continue;
            };
            if !package.publish {
                debug!(package = %info.name, "not publishable; skipping registry call");
                continue;
            }

            match self.registry.publish(package, &options) {
                Ok(_) => {
                    info!(package = %info.name, version = %info.new_version, "published");
                    report.published.push(info.name.clone());
                }
                Err(OperationError::Publish(PublishError::AlreadyPublished { .. })) => {
                    warn!(
                        package = %info.name,
                        version = %info.new_version,
                        "version already on registry; treating as published"
                    );
                    report.published.push(info.name.clone());
                }
                Err(e) => {
                    warn!(package = %info.name, error = %e, "publish failed; continuing");
                    report.publish_failures.push((info.name.clone(), e.to_string()));
                }
            }
        }
    }

    fn step<T>(&self, step: Step, f: impl FnOnce() -> Result<T>) -> Result<T> {
        debug!(step = %step, "starting step");
        f().map_err(|source| match source {
            e @ OperationError::StepFailed { .. } => e,
            e => OperationError::StepFailed {
                step,
                source: Box::new(e),
            },
        })
    }
}

fn commit_message(changes: &[ChangeInfo]) -> String {
    let mut message = String::from("Apply package version updates\n");
    for info in changes {
        message.push_str(&format!(
            "\n{} {} -> {} ({})",
            info.name, info.current_version, info.new_version, info.change
        ));
    }
    message
}
