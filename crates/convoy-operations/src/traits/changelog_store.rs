use convoy_changelog::ChangelogEntry;
use convoy_core::PackageInfo;

use crate::Result;

/// Per-package changelog persistence.
pub trait ChangelogStore: Send + Sync {
    /// Appends the entries of one release and re-renders the markdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read or written.
    fn append(&self, package: &PackageInfo, entries: Vec<ChangelogEntry>) -> Result<()>;

    /// Re-renders the markdown from the stored data without adding
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read or written.
    fn regenerate(&self, package: &PackageInfo) -> Result<()>;
}
