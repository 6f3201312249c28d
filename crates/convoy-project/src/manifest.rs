use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ProjectError;

#[derive(Debug, Clone, Deserialize)]
pub struct CargoManifest {
    pub package: Option<Package>,
    pub workspace: Option<WorkspaceSection>,
    #[serde(default)]
    pub dependencies: IndexMap<String, DependencyValue>,
    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: IndexMap<String, DependencyValue>,
    #[serde(default, rename = "build-dependencies")]
    pub build_dependencies: IndexMap<String, DependencyValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: Option<VersionField>,
    pub publish: Option<PublishField>,
    pub metadata: Option<PackageMetadata>,
}

/// `version = "1.2.3"` or `version.workspace = true`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VersionField {
    Literal(String),
    Inherited(InheritedField),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InheritedField {
    pub workspace: bool,
}

/// Cargo allows `publish = false` or a registry allow-list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PublishField {
    Enabled(bool),
    Registries(Vec<String>),
}

impl PublishField {
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Registries(registries) => !registries.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    pub convoy: Option<PackageConvoyMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageConvoyMetadata {
    pub publish: Option<bool>,
    pub version_policy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSection {
    pub members: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub package: Option<WorkspacePackage>,
    pub metadata: Option<WorkspaceMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspacePackage {
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceMetadata {
    pub convoy: Option<WorkspaceConvoyMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceConvoyMetadata {
    pub change_dir: Option<PathBuf>,
    pub target_branch: Option<String>,
    pub remote: Option<String>,
}

/// `dep = "^1.0.0"` or `dep = { version = "^1.0.0", path = "../dep" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DependencyValue {
    Range(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailedDependency {
    pub version: Option<String>,
    /// Renamed dependency: the real package name when the table key is
    /// an alias.
    pub package: Option<String>,
}

impl DependencyValue {
    #[must_use]
    pub fn range(&self) -> Option<&str> {
        match self {
            Self::Range(range) => Some(range),
            Self::Detailed(detailed) => detailed.version.as_deref(),
        }
    }

    /// The package name this entry resolves to, given its table key.
    #[must_use]
    pub fn package_name<'a>(&'a self, key: &'a str) -> &'a str {
        match self {
            Self::Detailed(detailed) => detailed.package.as_deref().unwrap_or(key),
            Self::Range(_) => key,
        }
    }
}

/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn read_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}
