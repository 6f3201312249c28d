use std::path::Path;
use std::process::{Command, Stdio};

use semver::Version;
use tracing::{debug, info};

use crate::command::{PublishOptions, publish_args, publish_env, registry_scope};
use crate::error::PublishError;
use crate::Result;

/// Report of one publish invocation, mostly for dry-run display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub package: String,
    pub command_line: String,
    pub executed: bool,
}

/// Drives the external publish tool, one blocking call per package.
/// Deliberately retry-free: a failed publish must surface, not repeat.
#[derive(Debug, Clone)]
pub struct CargoPublisher {
    program: String,
}

impl Default for CargoPublisher {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
        }
    }
}

impl CargoPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutes the publish program, used by tests to avoid touching
    /// a real registry.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Publishes one package, or in dry-run mode only reports the
    /// intended command line.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the tool cannot be spawned or the
    /// publish is rejected. Earlier publishes are never rolled back.
    pub fn publish(
        &self,
        package: &str,
        manifest_path: &Path,
        options: &PublishOptions,
    ) -> Result<PublishReport> {
        let args = publish_args(manifest_path, options);
        let command_line = format!("{} {}", self.program, args.join(" "));

        if options.dry_run {
            info!(package, command = %command_line, "dry run: skipping publish");
            return Ok(PublishReport {
                package: package.to_string(),
                command_line,
                executed: false,
            });
        }

        debug!(package, command = %command_line, "publishing");

        let output = Command::new(&self.program)
            .args(&args)
            .envs(publish_env(options))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| PublishError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(package, stderr));
        }

        Ok(PublishReport {
            package: package.to_string(),
            command_line,
            executed: true,
        })
    }

    /// Probes the registry for an exact version, for idempotent bulk
    /// re-publishing. A failed probe reports the version as absent; the
    /// subsequent publish will fail loudly if the registry disagrees.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Spawn`] if the tool cannot be started.
    pub fn version_exists(
        &self,
        package: &str,
        version: &Version,
        options: &PublishOptions,
    ) -> Result<bool> {
        let mut args = vec!["info".to_string(), format!("{package}@{version}")];
        if options.registry_url.is_some() {
            args.push("--registry".to_string());
            args.push(registry_scope().to_string());
        }

        let output = Command::new(&self.program)
            .args(&args)
            .envs(publish_env(options))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| PublishError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(package, %version, stderr = %stderr.trim(), "version probe negative");
        }

        Ok(output.status.success())
    }
}

fn classify_failure(package: &str, stderr: String) -> PublishError {
    let lowered = stderr.to_lowercase();

    if lowered.contains("already uploaded") || lowered.contains("already exists") {
        return PublishError::AlreadyPublished {
            package: package.to_string(),
        };
    }

    if lowered.contains("unauthorized") || lowered.contains("authentication") {
        return PublishError::AuthenticationFailed {
            package: package.to_string(),
        };
    }

    PublishError::Failed {
        package: package.to_string(),
        stderr,
    }
}
