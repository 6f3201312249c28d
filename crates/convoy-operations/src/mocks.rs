use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use convoy_changelog::ChangelogEntry;
use convoy_core::{ChangeRequest, PackageInfo};
use convoy_project::{Project, ProjectConfig, ProjectKind};
use convoy_publish::{PublishError, PublishOptions, PublishReport};
use indexmap::IndexMap;
use semver::Version;

use crate::traits::{
    ChangeStore, ChangelogStore, ManifestStore, RegistryPublisher, SourceControl,
};
use crate::{OperationError, Result};

/// # Panics
///
/// Panics if the version string is not valid semver.
#[must_use]
pub fn make_package(name: &str, version: &str, dependencies: &[(&str, &str)]) -> PackageInfo {
    PackageInfo {
        name: name.to_string(),
        version: version.parse().expect("valid version"),
        path: PathBuf::from(format!("/mock/workspace/packages/{name}")),
        publish: true,
        version_policy: None,
        dependencies: dependencies
            .iter()
            .map(|(dep, range)| ((*dep).to_string(), (*range).to_string()))
            .collect(),
    }
}

#[must_use]
pub fn make_project(packages: Vec<PackageInfo>) -> Project {
    Project {
        root: PathBuf::from("/mock/workspace"),
        kind: ProjectKind::VirtualWorkspace,
        packages,
        config: ProjectConfig::default(),
    }
}

/// Records every operation in call order and can be told to fail one
/// named operation, for exercising each fatal transition.
pub struct MockSourceControl {
    log: Mutex<Vec<String>>,
    branch: Mutex<String>,
    clean: bool,
    fail_on: Option<String>,
}

impl MockSourceControl {
    #[must_use]
    pub fn new(current_branch: &str) -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            branch: Mutex::new(current_branch.to_string()),
            clean: true,
            fail_on: None,
        }
    }

    #[must_use]
    pub fn with_dirty_tree(mut self) -> Self {
        self.clean = false;
        self
    }

    /// Makes the named operation (`"push_branch"`, `"merge_branch"`,
    /// ...) fail when first invoked.
    #[must_use]
    pub fn failing_on(mut self, operation: &str) -> Self {
        self.fail_on = Some(operation.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn log(&self) -> Vec<String> {
        self.log.lock().expect("lock poisoned").clone()
    }

    fn record(&self, operation: &str, detail: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(operation) {
            return Err(OperationError::Io(std::io::Error::other(format!(
                "mock failure in {operation}"
            ))));
        }
        let line = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {detail}")
        };
        self.log.lock().expect("lock poisoned").push(line);
        Ok(())
    }
}

impl SourceControl for MockSourceControl {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.lock().expect("lock poisoned").clone())
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record("create_branch", name)?;
        *self.branch.lock().expect("lock poisoned") = name.to_string();
        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.record("checkout", name)?;
        *self.branch.lock().expect("lock poisoned") = name.to_string();
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.record("stage_all", "")
    }

    fn commit(&self, message: &str) -> Result<String> {
        let first_line = message.lines().next().unwrap_or_default();
        self.record("commit", first_line)?;
        Ok("0000000000000000000000000000000000000000".to_string())
    }

    fn push_branch(&self, branch: &str) -> Result<()> {
        self.record("push_branch", branch)
    }

    fn pull(&self, branch: &str) -> Result<()> {
        self.record("pull", branch)
    }

    fn merge_branch(&self, branch: &str) -> Result<()> {
        self.record("merge_branch", branch)
    }

    fn create_tag(&self, name: &str, _message: &str) -> Result<()> {
        self.record("create_tag", name)
    }

    fn push_tags(&self) -> Result<()> {
        self.record("push_tags", "")
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.record("delete_branch", name)
    }
}

/// Records publishes; versions listed as existing make the probe
/// positive, and packages listed as failing reject their publish.
pub struct MockRegistry {
    published: Mutex<Vec<String>>,
    existing: HashSet<(String, String)>,
    failing: HashSet<String>,
}

impl MockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            existing: HashSet::new(),
            failing: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_existing_version(mut self, package: &str, version: &str) -> Self {
        self.existing
            .insert((package.to_string(), version.to_string()));
        self
    }

    #[must_use]
    pub fn failing_for(mut self, package: &str) -> Self {
        self.failing.insert(package.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<String> {
        self.published.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryPublisher for MockRegistry {
    fn publish(&self, package: &PackageInfo, options: &PublishOptions) -> Result<PublishReport> {
        if self.failing.contains(&package.name) {
            return Err(OperationError::Publish(PublishError::Failed {
                package: package.name.clone(),
                stderr: "mock registry rejection".to_string(),
            }));
        }

        if !options.dry_run {
            self.published
                .lock()
                .expect("lock poisoned")
                .push(package.name.clone());
        }

        Ok(PublishReport {
            package: package.name.clone(),
            command_line: format!("mock publish {}", package.name),
            executed: !options.dry_run,
        })
    }

    fn version_exists(&self, package: &PackageInfo, _options: &PublishOptions) -> Result<bool> {
        Ok(self
            .existing
            .contains(&(package.name.clone(), package.version.to_string())))
    }
}

/// In-memory change request directory.
pub struct InMemoryChangeStore {
    requests: Mutex<IndexMap<PathBuf, ChangeRequest>>,
    deleted: Mutex<Vec<PathBuf>>,
}

impl InMemoryChangeStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(IndexMap::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_request(self, filename: &str, request: ChangeRequest) -> Self {
        self.requests
            .lock()
            .expect("lock poisoned")
            .insert(PathBuf::from(filename), request);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn deleted(&self) -> Vec<PathBuf> {
        self.deleted.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.requests.lock().expect("lock poisoned").len()
    }
}

impl Default for InMemoryChangeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeStore for InMemoryChangeStore {
    fn list(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .requests
            .lock()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<ChangeRequest> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| OperationError::RequestFileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock file not found"),
            })
    }

    fn write(&self, request: &ChangeRequest) -> Result<String> {
        let filename = format!("{}-{}.md", request.package, request.change);
        self.requests
            .lock()
            .expect("lock poisoned")
            .insert(PathBuf::from(&filename), request.clone());
        Ok(filename)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let mut requests = self.requests.lock().expect("lock poisoned");
        requests.shift_remove(path);
        self.deleted
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }
}

/// Records manifest edits as flat strings for simple assertions.
pub struct RecordingManifestStore {
    edits: Mutex<Vec<String>>,
}

impl RecordingManifestStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            edits: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn edits(&self) -> Vec<String> {
        self.edits.lock().expect("lock poisoned").clone()
    }
}

impl Default for RecordingManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestStore for RecordingManifestStore {
    fn write_version(&self, package: &PackageInfo, version: &Version) -> Result<()> {
        self.edits
            .lock()
            .expect("lock poisoned")
            .push(format!("set-version {} {version}", package.name));
        Ok(())
    }

    fn update_dependency_range(
        &self,
        package: &PackageInfo,
        dependency: &str,
        version: &Version,
    ) -> Result<bool> {
        self.edits
            .lock()
            .expect("lock poisoned")
            .push(format!(
                "update-dependency {} {dependency} {version}",
                package.name
            ));
        Ok(true)
    }
}

/// Records appended changelog releases per package.
pub struct RecordingChangelogStore {
    appended: Mutex<Vec<(String, Vec<ChangelogEntry>)>>,
}

impl RecordingChangelogStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            appended: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn appended(&self) -> Vec<(String, Vec<ChangelogEntry>)> {
        self.appended.lock().expect("lock poisoned").clone()
    }
}

impl Default for RecordingChangelogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogStore for RecordingChangelogStore {
    fn append(&self, package: &PackageInfo, entries: Vec<ChangelogEntry>) -> Result<()> {
        self.appended
            .lock()
            .expect("lock poisoned")
            .push((package.name.clone(), entries));
        Ok(())
    }

    fn regenerate(&self, package: &PackageInfo) -> Result<()> {
        self.appended
            .lock()
            .expect("lock poisoned")
            .push((format!("regenerate:{}", package.name), Vec::new()));
        Ok(())
    }
}
