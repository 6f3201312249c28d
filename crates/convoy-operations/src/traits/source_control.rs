use crate::Result;

/// Sequencing primitives against one repository checkout. Every
/// operation fails loudly and aborts the orchestrator, except branch
/// deletion, which callers treat as advisory.
pub trait SourceControl: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if HEAD is detached or cannot be read.
    fn current_branch(&self) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the status check fails.
    fn is_working_tree_clean(&self) -> Result<bool>;

    /// Creates a branch off the current HEAD and checks it out.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch already exists.
    fn create_branch(&self, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the branch does not exist.
    fn checkout(&self, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the index cannot be updated.
    fn stage_all(&self) -> Result<()>;

    /// Commits the staged changes, returning the commit sha.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, message: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the push is rejected.
    fn push_branch(&self, branch: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the fetch fails or the merge conflicts.
    fn pull(&self, branch: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the merge conflicts.
    fn merge_branch(&self, branch: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the tag already exists.
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the push fails.
    fn push_tags(&self) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the branch cannot be deleted; callers log
    /// and continue.
    fn delete_branch(&self, name: &str) -> Result<()>;
}
