use convoy_core::PackageInfo;
use convoy_publish::{CargoPublisher, PublishOptions, PublishReport};

use crate::traits::RegistryPublisher;
use crate::Result;

/// Registry boundary backed by the external publish tool.
pub struct CargoRegistry {
    publisher: CargoPublisher,
}

impl CargoRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            publisher: CargoPublisher::new(),
        }
    }

    /// Substitutes the publish program, used by tests.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            publisher: CargoPublisher::new().with_program(program),
        }
    }
}

impl Default for CargoRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryPublisher for CargoRegistry {
    fn publish(&self, package: &PackageInfo, options: &PublishOptions) -> Result<PublishReport> {
        let report = self
            .publisher
            .publish(&package.name, &package.manifest_path(), options)?;
        Ok(report)
    }

    fn version_exists(&self, package: &PackageInfo, options: &PublishOptions) -> Result<bool> {
        let exists = self
            .publisher
            .version_exists(&package.name, &package.version, options)?;
        Ok(exists)
    }
}
