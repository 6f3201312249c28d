use std::path::Path;

use convoy_project::Project;

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no project can be found or manifests fail to
    /// parse.
    fn discover(&self, start_dir: &Path) -> Result<Project>;
}
