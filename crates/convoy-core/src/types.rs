use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::ConvoyError;

/// Magnitude of a change. The ordering is load-bearing: anything above
/// `Dependency` is a real semantic bump that triggers publish and tag,
/// while `Dependency` only refreshes recorded dependency ranges.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    #[default]
    None,
    Dependency,
    Patch,
    Minor,
    Major,
}

impl ChangeType {
    /// Whether this change warrants a registry publish and a tag.
    #[must_use]
    pub fn requires_publish(self) -> bool {
        self > Self::Dependency
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Dependency => "dependency",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

/// One author-submitted change declaration for a single package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub package: String,
    pub change: ChangeType,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Prerelease override applied uniformly to every version computed in a
/// run. At most one of the two forms may be configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrereleaseToken {
    /// Replaces the prerelease identifiers of the bumped version,
    /// e.g. `2.0.0-beta`.
    Name(String),
    /// Appended to the computed version as its prerelease component,
    /// e.g. `2.0.0-dev.20260807`.
    Suffix(String),
}

impl PrereleaseToken {
    /// Resolves the two CLI options into at most one token.
    ///
    /// # Errors
    ///
    /// Returns [`ConvoyError::PrereleaseConflict`] if both options are set.
    pub fn resolve(
        prerelease_name: Option<String>,
        suffix: Option<String>,
    ) -> Result<Option<Self>, ConvoyError> {
        match (prerelease_name, suffix) {
            (Some(_), Some(_)) => Err(ConvoyError::PrereleaseConflict),
            (Some(name), None) => Ok(Some(Self::Name(name))),
            (None, Some(suffix)) => Ok(Some(Self::Suffix(suffix))),
            (None, None) => Ok(None),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Name(s) | Self::Suffix(s) => s,
        }
    }
}

/// One workspace member as seen by the release engine. Loaded once per
/// run; only the version changes during orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    /// Whether the package may be published to a registry at all.
    pub publish: bool,
    pub version_policy: Option<String>,
    /// Declared dependency ranges, name to range string, in manifest
    /// order. Only entries naming another workspace member participate
    /// in the cascade.
    pub dependencies: IndexMap<String, String>,
}

impl PackageInfo {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join("Cargo.toml")
    }
}
