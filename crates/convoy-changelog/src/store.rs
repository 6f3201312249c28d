use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::ChangelogEntry;
use crate::error::ChangelogError;

/// Append-only, version-keyed changelog data for one package. New
/// entries are prepended so the file reads newest-first, matching the
/// rendered markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default, rename = "entry")]
    pub entries: Vec<ChangelogEntry>,
}

impl Changelog {
    /// Loads the data file, treating a missing file as an empty
    /// changelog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ChangelogError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ChangelogError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ChangelogError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ChangelogError> {
        let content = toml::to_string_pretty(self).map_err(|source| ChangelogError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

        std::fs::write(path, content).map_err(|source| ChangelogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Prepends the entries of a new release.
    pub fn prepend(&mut self, entries: Vec<ChangelogEntry>) {
        let mut combined = entries;
        combined.append(&mut self.entries);
        self.entries = combined;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
