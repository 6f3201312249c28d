use git2::{AnnotatedCommit, BranchType, build::CheckoutBuilder};
use tracing::debug;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Merges a local branch into the current branch. Fast-forwards
    /// when possible, otherwise creates a two-parent merge commit.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::MergeConflict`] if the index ends up
    /// conflicted; the merge state is cleaned up and the operator must
    /// resolve manually.
    pub fn merge_branch(&self, name: &str) -> Result<()> {
        let branch = self
            .inner
            .find_branch(name, BranchType::Local)
            .map_err(|_| GitError::BranchNotFound {
                name: name.to_string(),
            })?;
        let annotated = self.inner.reference_to_annotated_commit(branch.get())?;
        self.merge_annotated(&annotated, name)
    }

    pub(crate) fn merge_annotated(
        &self,
        annotated: &AnnotatedCommit<'_>,
        label: &str,
    ) -> Result<()> {
        let (analysis, _) = self.inner.merge_analysis(&[annotated])?;

        if analysis.is_up_to_date() {
            debug!(source = label, "merge: already up to date");
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let head = self.inner.head()?;
            let refname = head.name().ok_or(GitError::DetachedHead)?.to_string();
            drop(head);

            let mut reference = self.inner.find_reference(&refname)?;
            reference.set_target(annotated.id(), &format!("fast-forward to {label}"))?;
            self.inner.set_head(&refname)?;
            self.inner
                .checkout_head(Some(CheckoutBuilder::default().force()))?;
            debug!(source = label, "merge: fast-forwarded");
            return Ok(());
        }

        self.inner.merge(&[annotated], None, None)?;

        let mut index = self.inner.index()?;
        if index.has_conflicts() {
            self.inner.cleanup_state()?;
            return Err(GitError::MergeConflict {
                branch: label.to_string(),
            });
        }

        let tree_id = index.write_tree_to(&self.inner)?;
        let tree = self.inner.find_tree(tree_id)?;
        let sig = self.inner.signature()?;
        let head_commit = self.inner.head()?.peel_to_commit()?;
        let their_commit = self.inner.find_commit(annotated.id())?;

        self.inner.commit(
            Some("HEAD"),
            &sig,
            &sig,
            &format!("Merge branch '{label}'"),
            &tree,
            &[&head_commit, &their_commit],
        )?;
        self.inner.cleanup_state()?;
        debug!(source = label, "merge: created merge commit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use crate::GitError;
    use std::fs;

    #[test]
    fn fast_forward_merge() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let target = repo.current_branch()?;

        repo.create_branch("release")?;
        fs::write(dir.path().join("manifest.txt"), "2.0.0")?;
        repo.stage_all()?;
        let release_commit = repo.commit("bump versions")?;

        repo.checkout_branch(&target)?;
        repo.merge_branch("release")?;

        let head = repo.inner.head()?.peel_to_commit()?;
        assert_eq!(head.id().to_string(), release_commit.sha);
        assert!(dir.path().join("manifest.txt").exists());
        Ok(())
    }

    #[test]
    fn diverged_branches_get_merge_commit() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let target = repo.current_branch()?;

        repo.create_branch("release")?;
        fs::write(dir.path().join("release.txt"), "from release")?;
        repo.stage_all()?;
        repo.commit("release change")?;

        repo.checkout_branch(&target)?;
        fs::write(dir.path().join("target.txt"), "from target")?;
        repo.stage_all()?;
        repo.commit("target change")?;

        repo.merge_branch("release")?;

        let head = repo.inner.head()?.peel_to_commit()?;
        assert_eq!(head.parent_count(), 2);
        assert!(dir.path().join("release.txt").exists());
        assert!(dir.path().join("target.txt").exists());
        Ok(())
    }

    #[test]
    fn merge_of_current_head_is_noop() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let target = repo.current_branch()?;

        repo.create_branch("release")?;
        repo.checkout_branch(&target)?;

        repo.merge_branch("release")?;
        Ok(())
    }

    #[test]
    fn conflicting_merge_reported() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let target = repo.current_branch()?;

        fs::write(dir.path().join("shared.txt"), "base")?;
        repo.stage_all()?;
        repo.commit("base")?;

        repo.create_branch("release")?;
        fs::write(dir.path().join("shared.txt"), "release side")?;
        repo.stage_all()?;
        repo.commit("release edit")?;

        repo.checkout_branch(&target)?;
        fs::write(dir.path().join("shared.txt"), "target side")?;
        repo.stage_all()?;
        repo.commit("target edit")?;

        let result = repo.merge_branch("release");
        assert!(matches!(result, Err(GitError::MergeConflict { .. })));
        Ok(())
    }

    #[test]
    fn unknown_branch_reported() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let result = repo.merge_branch("does-not-exist");

        assert!(matches!(result, Err(GitError::BranchNotFound { .. })));
        Ok(())
    }
}
