use std::path::Path;

use convoy_git::Repository;

use crate::traits::SourceControl;
use crate::Result;

/// git2-backed gateway bound to one repository checkout and one remote.
pub struct GitSourceControl {
    repository: Repository,
    remote: String,
}

impl GitSourceControl {
    /// # Errors
    ///
    /// Returns an error if the path is not inside a git repository.
    pub fn open(path: &Path, remote: impl Into<String>) -> Result<Self> {
        Ok(Self {
            repository: Repository::open(path)?,
            remote: remote.into(),
        })
    }
}

impl SourceControl for GitSourceControl {
    fn current_branch(&self) -> Result<String> {
        Ok(self.repository.current_branch()?)
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.repository.is_working_tree_clean()?)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        Ok(self.repository.create_branch(name)?)
    }

    fn checkout(&self, name: &str) -> Result<()> {
        Ok(self.repository.checkout_branch(name)?)
    }

    fn stage_all(&self) -> Result<()> {
        Ok(self.repository.stage_all()?)
    }

    fn commit(&self, message: &str) -> Result<String> {
        let info = self.repository.commit(message)?;
        Ok(info.sha)
    }

    fn push_branch(&self, branch: &str) -> Result<()> {
        Ok(self.repository.push_branch(&self.remote, branch)?)
    }

    fn pull(&self, branch: &str) -> Result<()> {
        Ok(self.repository.pull(&self.remote, branch)?)
    }

    fn merge_branch(&self, branch: &str) -> Result<()> {
        Ok(self.repository.merge_branch(branch)?)
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.repository.create_tag(name, message)?;
        Ok(())
    }

    fn push_tags(&self) -> Result<()> {
        Ok(self.repository.push_tags(&self.remote)?)
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        Ok(self.repository.delete_branch(name)?)
    }
}
