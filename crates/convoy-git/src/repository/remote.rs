use tracing::debug;

use crate::Result;

use super::Repository;

impl Repository {
    /// Pushes one local branch to the remote under the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote is unknown or the push is
    /// rejected (for example by a concurrent release).
    pub fn push_branch(&self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.inner.find_remote(remote_name)?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[refspec.as_str()], None)?;
        debug!(remote = remote_name, branch, "pushed branch");
        Ok(())
    }

    /// Pushes every local tag in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote is unknown or the push fails.
    pub fn push_tags(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.inner.find_remote(remote_name)?;
        remote.push(&["refs/tags/*:refs/tags/*"], None)?;
        debug!(remote = remote_name, "pushed tags");
        Ok(())
    }

    /// Fetches one branch and merges it into the current branch, so a
    /// later push is not rejected as a stale fast-forward.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the merge conflicts.
    pub fn pull(&self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.inner.find_remote(remote_name)?;
        remote.fetch(&[branch], None, None)?;

        let fetch_head = self.inner.find_reference("FETCH_HEAD")?;
        let annotated = self.inner.reference_to_annotated_commit(&fetch_head)?;
        self.merge_annotated(&annotated, branch)
    }

    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub fn remote_url(&self, remote_name: &str) -> Result<Option<String>> {
        let Ok(remote) = self.inner.find_remote(remote_name) else {
            return Ok(None);
        };

        Ok(remote.url().map(String::from))
    }
}
