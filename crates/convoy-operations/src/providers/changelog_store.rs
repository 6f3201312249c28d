use convoy_changelog::{
    CHANGELOG_DATA_FILE, CHANGELOG_MARKDOWN_FILE, Changelog, ChangelogEntry, render_markdown,
};
use convoy_core::PackageInfo;

use crate::error::OperationError;
use crate::traits::ChangelogStore;
use crate::Result;

/// Per-package `CHANGELOG.toml` plus rendered `CHANGELOG.md`.
pub struct FileSystemChangelogStore;

impl FileSystemChangelogStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render(&self, package: &PackageInfo, changelog: &Changelog) -> Result<()> {
        let markdown = render_markdown(&package.name, changelog);
        std::fs::write(package.path.join(CHANGELOG_MARKDOWN_FILE), markdown)
            .map_err(OperationError::Io)
    }
}

impl Default for FileSystemChangelogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogStore for FileSystemChangelogStore {
    fn append(&self, package: &PackageInfo, entries: Vec<ChangelogEntry>) -> Result<()> {
        let data_path = package.path.join(CHANGELOG_DATA_FILE);

        let mut changelog = Changelog::load(&data_path)?;
        changelog.prepend(entries);
        changelog.save(&data_path)?;

        self.render(package, &changelog)
    }

    fn regenerate(&self, package: &PackageInfo) -> Result<()> {
        let data_path = package.path.join(CHANGELOG_DATA_FILE);
        let changelog = Changelog::load(&data_path)?;

        if changelog.is_empty() && !data_path.exists() {
            return Ok(());
        }

        self.render(package, &changelog)
    }
}
