use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("change request is missing the opening delimiter")]
    MissingOpeningDelimiter,

    #[error("change request is missing the closing delimiter")]
    MissingClosingDelimiter,

    #[error("change request front matter is empty")]
    EmptyFrontMatter,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("change request exceeds maximum size of {max_bytes} bytes")]
    InputTooLarge { max_bytes: usize },

    #[error("change request must name a package")]
    EmptyPackageName,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yml::Error),
}
