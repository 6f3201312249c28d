use convoy_core::PackageInfo;
use semver::Version;

use crate::Result;

/// Mutation of package manifests on disk.
pub trait ManifestStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn write_version(&self, package: &PackageInfo, version: &Version) -> Result<()>;

    /// Refreshes one dependency range, preserving its operator.
    /// Returns whether the manifest changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn update_dependency_range(
        &self,
        package: &PackageInfo,
        dependency: &str,
        version: &Version,
    ) -> Result<bool>;
}
