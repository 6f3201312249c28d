use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error(transparent)]
    Core(#[from] convoy_core::ConvoyError),

    #[error(transparent)]
    Project(#[from] convoy_project::ProjectError),

    #[error(transparent)]
    Operation(#[from] convoy_operations::OperationError),

    #[error("{count} package(s) failed to publish")]
    PublishFailures { count: usize },
}

pub(crate) type Result<T> = std::result::Result<T, CliError>;
