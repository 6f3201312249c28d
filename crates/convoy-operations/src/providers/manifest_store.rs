use convoy_core::PackageInfo;
use semver::Version;

use crate::traits::ManifestStore;
use crate::Result;

/// Lossless on-disk manifest edits via convoy-manifest.
pub struct TomlManifestStore;

impl TomlManifestStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TomlManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestStore for TomlManifestStore {
    fn write_version(&self, package: &PackageInfo, version: &Version) -> Result<()> {
        convoy_manifest::write_version(&package.manifest_path(), version)?;
        Ok(())
    }

    fn update_dependency_range(
        &self,
        package: &PackageInfo,
        dependency: &str,
        version: &Version,
    ) -> Result<bool> {
        let changed = convoy_manifest::update_dependency_range(
            &package.manifest_path(),
            dependency,
            version,
        )?;
        Ok(changed)
    }
}
