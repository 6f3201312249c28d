use std::path::{Path, PathBuf};

use crate::DEFAULT_CHANGE_DIR;
use crate::manifest::WorkspaceConvoyMetadata;

const DEFAULT_TARGET_BRANCH: &str = "main";
const DEFAULT_REMOTE: &str = "origin";

/// Project-level settings from `[workspace.metadata.convoy]`, with
/// defaults for everything absent.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    change_dir: PathBuf,
    target_branch: String,
    remote: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            change_dir: PathBuf::from(DEFAULT_CHANGE_DIR),
            target_branch: String::from(DEFAULT_TARGET_BRANCH),
            remote: String::from(DEFAULT_REMOTE),
        }
    }
}

impl ProjectConfig {
    #[must_use]
    pub(crate) fn from_metadata(metadata: Option<WorkspaceConvoyMetadata>) -> Self {
        let defaults = Self::default();
        match metadata {
            None => defaults,
            Some(md) => Self {
                change_dir: md.change_dir.unwrap_or(defaults.change_dir),
                target_branch: md.target_branch.unwrap_or(defaults.target_branch),
                remote: md.remote.unwrap_or(defaults.remote),
            },
        }
    }

    /// Change request directory, relative to the workspace root.
    #[must_use]
    pub fn change_dir(&self) -> &Path {
        &self.change_dir
    }

    #[must_use]
    pub fn target_branch(&self) -> &str {
        &self.target_branch
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }
}
