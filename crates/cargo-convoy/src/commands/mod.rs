mod change;
mod publish;
mod status;

use std::path::Path;

use clap::{Args, Subcommand};
use convoy_core::ChangeType;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Release pending change requests: bump versions, commit, publish,
    /// tag, and merge back to the target branch
    Publish(PublishArgs),
    /// Record a new change request
    Change(ChangeArgs),
    /// Show pending change requests and the computed release plan
    Status(StatusArgs),
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Publish(args) => publish::run(args, start_path),
            Self::Change(args) => change::run(args, start_path),
            Self::Status(args) => status::run(&args, start_path),
        }
    }
}

#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Write manifest and changelog edits and run the branch workflow
    /// (omit for a dry run)
    #[arg(long)]
    pub apply: bool,

    /// Invoke the registry publisher for each released package
    #[arg(long)]
    pub publish: bool,

    /// Branch the release is merged back into (defaults to the
    /// configured target branch)
    #[arg(long = "target-branch")]
    pub target_branch: Option<String>,

    /// Alternate registry URL; also suppresses tagging for this run
    #[arg(long)]
    pub registry: Option<String>,

    /// Registry auth token, passed through the environment
    #[arg(long)]
    pub token: Option<String>,

    /// Distribution tag forwarded to the publish tool
    #[arg(long)]
    pub tag: Option<String>,

    /// Re-publish every publishable package whose current version is
    /// absent from the registry, bypassing change requests
    #[arg(long = "include-all")]
    pub include_all: bool,

    /// With --include-all: restrict the pass to packages carrying this
    /// version policy
    #[arg(long = "version-policy")]
    pub version_policy: Option<String>,

    /// Prerelease identifier applied to every computed version
    #[arg(long = "prerelease-name", conflicts_with = "suffix")]
    pub prerelease_name: Option<String>,

    /// Suffix appended to every computed version
    #[arg(long)]
    pub suffix: Option<String>,

    /// With --include-all: publish even if the version already exists
    #[arg(long)]
    pub force: bool,

    /// Attach author/commit metadata to changelog entries
    #[arg(long = "add-commit-details")]
    pub add_commit_details: bool,

    /// Re-render every CHANGELOG.md from its stored data and exit
    #[arg(long = "regenerate-changelogs")]
    pub regenerate_changelogs: bool,
}

#[derive(Args)]
pub(crate) struct ChangeArgs {
    /// Package the change applies to
    #[arg(long)]
    pub package: String,

    /// Magnitude of the change
    #[arg(long, value_enum)]
    pub change: ChangeType,

    /// Description recorded in the changelog on release
    #[arg(long)]
    pub message: String,

    /// Author recorded with the request
    #[arg(long)]
    pub author: Option<String>,

    /// Commit hash recorded with the request
    #[arg(long)]
    pub commit: Option<String>,
}

#[derive(Args)]
pub(crate) struct StatusArgs {}
