use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to run '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("publish of '{package}' was rejected: version already exists on the registry")]
    AlreadyPublished { package: String },

    #[error("publish of '{package}' failed: registry authentication rejected")]
    AuthenticationFailed { package: String },

    #[error("publish of '{package}' failed: {stderr}")]
    Failed { package: String, stderr: String },
}
