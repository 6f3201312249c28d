mod change_store;
mod changelog_store;
mod manifest_store;
mod project;
mod registry;
mod source_control;

pub use change_store::FileSystemChangeStore;
pub use changelog_store::FileSystemChangelogStore;
pub use manifest_store::TomlManifestStore;
pub use project::WorkspaceProjectProvider;
pub use registry::CargoRegistry;
pub use source_control::GitSourceControl;
