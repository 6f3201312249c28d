use std::path::Path;

use convoy_project::{Project, discover_project};

use crate::traits::ProjectProvider;
use crate::Result;

pub struct WorkspaceProjectProvider;

impl WorkspaceProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorkspaceProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for WorkspaceProjectProvider {
    fn discover(&self, start_dir: &Path) -> Result<Project> {
        Ok(discover_project(start_dir)?)
    }
}
