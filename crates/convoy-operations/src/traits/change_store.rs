use std::path::{Path, PathBuf};

use convoy_core::ChangeRequest;

use crate::Result;

/// Access to the pending change request directory.
pub trait ChangeStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list(&self) -> Result<Vec<PathBuf>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn read(&self, path: &Path) -> Result<ChangeRequest>;

    /// Writes a new change request, returning its filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized or written.
    fn write(&self, request: &ChangeRequest) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be deleted.
    fn delete(&self, path: &Path) -> Result<()>;
}
