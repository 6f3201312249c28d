use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("HEAD is detached, not on a branch")]
    DetachedHead,

    #[error("merge of branch '{branch}' produced conflicts")]
    MergeConflict { branch: String },

    #[error("branch '{name}' not found")]
    BranchNotFound { name: String },
}
