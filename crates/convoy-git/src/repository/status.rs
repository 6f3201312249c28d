use git2::{Status, StatusOptions};

use crate::Result;

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the status check fails.
    pub fn is_working_tree_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.inner.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .all(|entry| entry.status() == Status::CURRENT))
    }
}
