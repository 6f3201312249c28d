use std::path::Path;

use convoy_operations::ChangeManager;
use convoy_operations::providers::{FileSystemChangeStore, WorkspaceProjectProvider};
use convoy_operations::traits::ProjectProvider;

use super::StatusArgs;
use crate::error::Result;
use crate::output;

pub(crate) fn run(_args: &StatusArgs, start_path: &Path) -> Result<()> {
    let project = WorkspaceProjectProvider::new().discover(start_path)?;
    let store = FileSystemChangeStore::new(project.change_dir());

    let manager = ChangeManager::load(&project, &store, None, false)?;

    if !manager.has_changes() {
        println!("No pending change requests.");
        return Ok(());
    }

    println!("Computed release plan:");
    output::print_releases(manager.changes());

    if !manager.unknown_packages().is_empty() {
        println!("\nRequests for unknown packages (skipped):");
        for name in manager.unknown_packages() {
            println!("  {name}");
        }
    }

    Ok(())
}
