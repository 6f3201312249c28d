use std::path::Path;

use convoy_core::ChangeRequest;
use convoy_operations::OperationError;
use convoy_operations::providers::{FileSystemChangeStore, WorkspaceProjectProvider};
use convoy_operations::traits::{ChangeStore, ProjectProvider};

use super::ChangeArgs;
use crate::error::Result;

pub(crate) fn run(args: ChangeArgs, start_path: &Path) -> Result<()> {
    let project = WorkspaceProjectProvider::new().discover(start_path)?;

    if project.package(&args.package).is_none() {
        let available = project
            .packages
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(OperationError::UnknownPackage {
            name: args.package,
            available,
        }
        .into());
    }

    let request = ChangeRequest {
        package: args.package,
        change: args.change,
        comment: args.message,
        author: args.author,
        commit: args.commit,
    };

    let store = FileSystemChangeStore::new(project.change_dir());
    let filename = store.write(&request)?;

    println!(
        "Recorded {} change for '{}' in {}",
        request.change,
        request.package,
        project.config.change_dir().join(filename).display()
    );
    Ok(())
}
