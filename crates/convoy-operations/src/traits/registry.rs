use convoy_core::PackageInfo;
use convoy_publish::{PublishOptions, PublishReport};

use crate::Result;

/// External package-registry boundary. Calls are blocking, never
/// retried automatically, and never rolled back.
pub trait RegistryPublisher: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the publish invocation fails; earlier
    /// publishes stay in place.
    fn publish(&self, package: &PackageInfo, options: &PublishOptions) -> Result<PublishReport>;

    /// Whether the package's current local version already exists on
    /// the target registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe cannot be started at all.
    fn version_exists(&self, package: &PackageInfo, options: &PublishOptions) -> Result<bool>;
}
