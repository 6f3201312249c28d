use chrono::NaiveDate;
use semver::Version;
use serde::{Deserialize, Serialize};

use convoy_core::ChangeType;

/// One released change, keyed by the version it shipped in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub version: Version,
    pub change: ChangeType,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub date: NaiveDate,
}

impl ChangelogEntry {
    #[must_use]
    pub fn new(
        version: Version,
        change: ChangeType,
        comment: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            version,
            change,
            comment: comment.into(),
            author: None,
            commit: None,
            date,
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }
}
