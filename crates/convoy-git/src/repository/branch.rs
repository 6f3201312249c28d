use git2::{BranchType, build::CheckoutBuilder};
use tracing::debug;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD does not point at a
    /// branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// Creates a branch off the current HEAD and checks it out.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch already exists or HEAD cannot be
    /// resolved.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        let head_commit = self.inner.head()?.peel_to_commit()?;
        self.inner.branch(name, &head_commit, false)?;
        debug!(branch = name, "created branch");
        self.checkout_branch(name)
    }

    /// # Errors
    ///
    /// Returns [`GitError::BranchNotFound`] if the branch does not
    /// exist, or an error if the working tree cannot be updated.
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        self.inner
            .find_branch(name, BranchType::Local)
            .map_err(|_| GitError::BranchNotFound {
                name: name.to_string(),
            })?;

        let refname = format!("refs/heads/{name}");
        self.inner.set_head(&refname)?;
        self.inner
            .checkout_head(Some(CheckoutBuilder::default().safe()))?;
        debug!(branch = name, "checked out branch");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GitError::BranchNotFound`] if the branch does not
    /// exist. Deleting the currently checked out branch fails.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let mut branch = self
            .inner
            .find_branch(name, BranchType::Local)
            .map_err(|_| GitError::BranchNotFound {
                name: name.to_string(),
            })?;

        branch.delete()?;
        debug!(branch = name, "deleted branch");
        Ok(())
    }
}
