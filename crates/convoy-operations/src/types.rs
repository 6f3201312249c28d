use convoy_core::{ChangeRequest, ChangeType, PrereleaseToken};
use convoy_publish::PublishOptions;
use semver::Version;

/// The computed release decision for one package, one entry of the
/// ordered change list. Read-only for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeInfo {
    pub name: String,
    pub change: ChangeType,
    pub current_version: Version,
    pub new_version: Version,
    /// The merged author requests backing this decision; empty for
    /// automatic dependency bumps.
    pub requests: Vec<ChangeRequest>,
}

impl ChangeInfo {
    #[must_use]
    pub fn requires_publish(&self) -> bool {
        self.change.requires_publish()
    }
}

/// One intended manifest edit, reported in dry runs and applied
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedEdit {
    SetVersion {
        package: String,
        version: Version,
    },
    UpdateDependency {
        package: String,
        dependency: String,
        version: Version,
    },
}

/// Caller intent for one publish run.
#[derive(Debug, Clone, Default)]
pub struct PublishInput {
    /// Write manifest/changelog edits and run the branch workflow.
    /// Without this the run is a pure dry run.
    pub apply: bool,
    /// Actually invoke the registry publisher.
    pub publish: bool,
    /// Overrides the configured target branch.
    pub target_branch: Option<String>,
    pub registry_url: Option<String>,
    pub token: Option<String>,
    pub dist_tag: Option<String>,
    pub force: bool,
    pub include_commit_details: bool,
    pub prerelease: Option<PrereleaseToken>,
    /// Bulk mode only: restricts the pass to packages carrying this
    /// version policy.
    pub version_policy: Option<String>,
}

impl PublishInput {
    /// Documented rule: any registry override suppresses tagging for
    /// the whole run, whether or not publishing was requested. An
    /// alternate registry must not pollute the canonical tag namespace.
    #[must_use]
    pub fn should_tag(&self) -> bool {
        self.registry_url.is_none()
    }

    #[must_use]
    pub fn publish_options(&self, dry_run: bool) -> PublishOptions {
        PublishOptions {
            registry_url: self.registry_url.clone(),
            token: self.token.clone(),
            dist_tag: self.dist_tag.clone(),
            force: self.force,
            dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_override_suppresses_tagging() {
        let input = PublishInput {
            publish: true,
            registry_url: Some("https://registry.example.com/index".to_string()),
            ..PublishInput::default()
        };

        assert!(!input.should_tag());
    }

    #[test]
    fn override_suppresses_tagging_even_without_publish() {
        let input = PublishInput {
            publish: false,
            registry_url: Some("https://registry.example.com/index".to_string()),
            ..PublishInput::default()
        };

        assert!(!input.should_tag());
    }

    #[test]
    fn default_registry_allows_tagging() {
        let input = PublishInput {
            publish: true,
            ..PublishInput::default()
        };

        assert!(input.should_tag());
    }
}
