use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvoyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid version '{version}': {source}")]
    Version {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("--prerelease-name and --suffix are mutually exclusive")]
    PrereleaseConflict,

    #[error("invalid prerelease identifier '{identifier}': {source}")]
    InvalidPrerelease {
        identifier: String,
        #[source]
        source: semver::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvoyError>;
