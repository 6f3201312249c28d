use git2::IndexAddOption;

use crate::Result;

use super::Repository;

impl Repository {
    /// Stages every change in the working tree, including new and
    /// deleted files.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be updated or written.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.inner.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }
}
