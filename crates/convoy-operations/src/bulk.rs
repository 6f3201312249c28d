use convoy_project::Project;
use tracing::{debug, info, warn};

use crate::orchestrator::Step;
use crate::traits::{RegistryPublisher, SourceControl};
use crate::types::PublishInput;
use crate::{OperationError, Result};

#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    pub published: Vec<String>,
    /// Packages whose current version already exists on the registry.
    pub skipped: Vec<String>,
    pub publish_failures: Vec<(String, String)>,
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub enum BulkOutcome {
    DryRun(BulkReport),
    Completed(BulkReport),
}

/// The `--include-all` path: bypasses change requests entirely and
/// re-publishes every publishable package whose current manifest
/// version is absent from the registry. Idempotent under repeated runs.
pub struct BulkPublisher<SC, RP> {
    source_control: SC,
    registry: RP,
}

impl<SC, RP> BulkPublisher<SC, RP>
where
    SC: SourceControl,
    RP: RegistryPublisher,
{
    pub fn new(source_control: SC, registry: RP) -> Self {
        Self {
            source_control,
            registry,
        }
    }

    /// Iterates all publishable packages, optionally filtered by a
    /// version policy. Without `publish` the pass only reports; with it
    /// each absent version is published and tagged, and new tags are
    /// pushed once at the end.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::StepFailed`] on a fatal source-control
    /// failure; publish failures are collected per package instead.
    pub fn run(&self, project: &Project, input: &PublishInput) -> Result<BulkOutcome> {
        let mut report = BulkReport::default();
        let probe_options = input.publish_options(true);
        let publish_options = input.publish_options(false);

        for package in &project.packages {
            if !package.publish {
                debug!(package = %package.name, "not publishable; skipping");
                continue;
            }

            if let Some(policy) = &input.version_policy {
                if package.version_policy.as_ref() != Some(policy) {
                    debug!(package = %package.name, policy, "outside version policy; skipping");
                    continue;
                }
            }

            let exists = self.registry.version_exists(package, &probe_options)?;
            if exists && !input.force {
                info!(
                    package = %package.name,
                    version = %package.version,
                    "skip, not updated"
                );
                report.skipped.push(package.name.clone());
                continue;
            }

            if !input.publish {
                report.published.push(package.name.clone());
                continue;
            }

            match self.registry.publish(package, &publish_options) {
                Ok(_) => {
                    info!(package = %package.name, version = %package.version, "published");
                    report.published.push(package.name.clone());

                    if input.should_tag() {
                        let tag = format!("{}-v{}", package.name, package.version);
                        let message = format!("Release {} {}", package.name, package.version);
                        self.wrap_step(Step::TagPublished, || {
                            self.source_control.create_tag(&tag, &message)
                        })?;
                        report.tags.push(tag);
                    }
                }
                Err(e) => {
                    warn!(package = %package.name, error = %e, "publish failed; continuing");
                    report
                        .publish_failures
                        .push((package.name.clone(), e.to_string()));
                }
            }
        }

        if !input.publish {
            return Ok(BulkOutcome::DryRun(report));
        }

        // One batched push keeps the tag set atomic relative to this
        // run and avoids a network round-trip per package.
        if !report.tags.is_empty() {
            self.wrap_step(Step::PushTags, || self.source_control.push_tags())?;
        }

        Ok(BulkOutcome::Completed(report))
    }

    fn wrap_step<T>(&self, step: Step, f: impl FnOnce() -> Result<T>) -> Result<T> {
        f().map_err(|source| OperationError::StepFailed {
            step,
            source: Box::new(source),
        })
    }
}
