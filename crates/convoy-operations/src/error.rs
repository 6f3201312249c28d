use std::path::PathBuf;

use thiserror::Error;

use crate::orchestrator::Step;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] convoy_core::ConvoyError),

    #[error(transparent)]
    Git(#[from] convoy_git::GitError),

    #[error(transparent)]
    Project(#[from] convoy_project::ProjectError),

    #[error(transparent)]
    Manifest(#[from] convoy_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] convoy_changelog::ChangelogError),

    #[error(transparent)]
    Publish(#[from] convoy_publish::PublishError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("failed to read change request '{path}'")]
    RequestFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse change request '{path}'")]
    RequestParse {
        path: PathBuf,
        #[source]
        source: convoy_parse::FormatError,
    },

    #[error("failed to write change request file")]
    RequestFileWrite(#[source] std::io::Error),

    #[error("failed to delete change request '{path}'")]
    RequestFileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list change requests in '{path}'")]
    RequestList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize change request")]
    RequestSerialize(#[source] convoy_parse::FormatError),

    #[error("working tree has uncommitted changes; commit or stash them first")]
    DirtyWorkingTree,

    #[error("current branch is '{current}' but the target branch is '{expected}'")]
    WrongBranch { current: String, expected: String },

    #[error("dependency cycle among changed packages: {}", packages.join(" -> "))]
    DependencyCycle { packages: Vec<String> },

    #[error("unknown package '{name}' (available: {available})")]
    UnknownPackage { name: String, available: String },

    #[error("release failed at step '{step}'")]
    StepFailed {
        step: Step,
        #[source]
        source: Box<OperationError>,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;
