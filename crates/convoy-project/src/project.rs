use std::path::{Path, PathBuf};

use convoy_core::PackageInfo;
use globset::GlobBuilder;
use indexmap::IndexMap;
use semver::Version;

use crate::config::ProjectConfig;
use crate::error::ProjectError;
use crate::manifest::{CargoManifest, PublishField, VersionField, read_manifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    VirtualWorkspace,
    WorkspaceWithRoot,
    SinglePackage,
}

/// The monorepo as seen by one release run: every member package plus
/// the project configuration. Loaded once, never mutated.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub kind: ProjectKind,
    pub packages: Vec<PackageInfo>,
    pub config: ProjectConfig,
}

impl Project {
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Absolute path of the change request directory.
    #[must_use]
    pub fn change_dir(&self) -> PathBuf {
        self.root.join(self.config.change_dir())
    }
}

/// # Errors
///
/// Returns `ProjectError` if no project root can be found or if
/// manifest parsing fails.
pub fn discover_project(start_dir: &Path) -> Result<Project, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, manifest) = find_project_root(&start_dir)?;
    let kind = determine_project_kind(&manifest);
    let config = ProjectConfig::from_metadata(
        manifest
            .workspace
            .as_ref()
            .and_then(|ws| ws.metadata.clone())
            .and_then(|md| md.convoy),
    );
    let packages = collect_packages(&root, &manifest, kind)?;

    Ok(Project {
        root,
        kind,
        packages,
        config,
    })
}

fn find_project_root(start_dir: &Path) -> Result<(PathBuf, CargoManifest), ProjectError> {
    let mut current = start_dir.to_path_buf();
    let mut fallback_single_package: Option<(PathBuf, CargoManifest)> = None;

    loop {
        let manifest_path = current.join("Cargo.toml");

        if manifest_path.exists() {
            let manifest = read_manifest(&manifest_path)?;

            if manifest.workspace.is_some() {
                return Ok((current, manifest));
            }

            if manifest.package.is_some() && fallback_single_package.is_none() {
                fallback_single_package = Some((current.clone(), manifest));
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return fallback_single_package.ok_or_else(|| ProjectError::NotFound {
                    start_dir: start_dir.to_path_buf(),
                });
            }
        }
    }
}

fn determine_project_kind(manifest: &CargoManifest) -> ProjectKind {
    match (&manifest.workspace, &manifest.package) {
        (Some(_), Some(_)) => ProjectKind::WorkspaceWithRoot,
        (None, Some(_)) => ProjectKind::SinglePackage,
        (Some(_) | None, None) => ProjectKind::VirtualWorkspace,
    }
}

fn collect_packages(
    root: &Path,
    manifest: &CargoManifest,
    kind: ProjectKind,
) -> Result<Vec<PackageInfo>, ProjectError> {
    let workspace_version = manifest
        .workspace
        .as_ref()
        .and_then(|ws| ws.package.as_ref())
        .and_then(|pkg| pkg.version.as_ref());

    let mut packages = Vec::new();

    if matches!(kind, ProjectKind::WorkspaceWithRoot | ProjectKind::SinglePackage) {
        packages.push(build_package_info(
            root,
            manifest,
            workspace_version,
            &root.join("Cargo.toml"),
        )?);
    }

    if kind == ProjectKind::SinglePackage {
        return Ok(packages);
    }

    if let Some(workspace) = &manifest.workspace {
        let members = workspace.members.as_deref().unwrap_or(&[]);
        let excludes = workspace.exclude.as_deref().unwrap_or(&[]);

        for pattern in members {
            let member_dirs = expand_glob_pattern(root, pattern, excludes)?;

            for member_dir in member_dirs {
                let member_manifest_path = member_dir.join("Cargo.toml");
                if !member_manifest_path.exists() {
                    continue;
                }

                let member_manifest = read_manifest(&member_manifest_path)?;
                if member_manifest.package.is_some() {
                    packages.push(build_package_info(
                        &member_dir,
                        &member_manifest,
                        workspace_version,
                        &member_manifest_path,
                    )?);
                }
            }
        }
    }

    Ok(packages)
}

fn build_package_info(
    package_dir: &Path,
    manifest: &CargoManifest,
    workspace_version: Option<&String>,
    manifest_path: &Path,
) -> Result<PackageInfo, ProjectError> {
    let package = manifest
        .package
        .as_ref()
        .ok_or(ProjectError::MissingField {
            path: manifest_path.to_path_buf(),
            field: "package",
        })?;

    let version = resolve_version(package.version.as_ref(), workspace_version, manifest_path)?;

    let convoy_metadata = package.metadata.as_ref().and_then(|md| md.convoy.as_ref());

    let cargo_publishable = package
        .publish
        .as_ref()
        .is_none_or(PublishField::is_publishable);
    let metadata_publishable = convoy_metadata.and_then(|md| md.publish).unwrap_or(true);

    let version_policy = convoy_metadata.and_then(|md| md.version_policy.clone());

    let mut dependencies: IndexMap<String, String> = IndexMap::new();
    for deps in [
        &manifest.dependencies,
        &manifest.dev_dependencies,
        &manifest.build_dependencies,
    ] {
        for (key, dep) in deps {
            if let Some(range) = dep.range() {
                let name = dep.package_name(key).to_string();
                dependencies.entry(name).or_insert_with(|| range.to_string());
            }
        }
    }

    Ok(PackageInfo {
        name: package.name.clone(),
        version,
        path: package_dir.to_path_buf(),
        publish: cargo_publishable && metadata_publishable,
        version_policy,
        dependencies,
    })
}

fn resolve_version(
    version_field: Option<&VersionField>,
    workspace_version: Option<&String>,
    manifest_path: &Path,
) -> Result<Version, ProjectError> {
    let version_str = match version_field {
        Some(VersionField::Literal(v)) => v.clone(),
        Some(VersionField::Inherited(inherited)) if inherited.workspace => workspace_version
            .ok_or_else(|| ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "workspace.package.version",
            })?
            .clone(),
        Some(VersionField::Inherited(_)) | None => {
            return Err(ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "package.version",
            });
        }
    };

    version_str
        .parse()
        .map_err(|source| ProjectError::InvalidVersion {
            path: manifest_path.to_path_buf(),
            version: version_str,
            source,
        })
}

fn expand_glob_pattern(
    root: &Path,
    pattern: &str,
    excludes: &[String],
) -> Result<Vec<PathBuf>, ProjectError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let exclude_matchers: Vec<_> = excludes
        .iter()
        .filter_map(|ex| {
            GlobBuilder::new(ex)
                .literal_separator(true)
                .build()
                .ok()
                .map(|g| g.compile_matcher())
        })
        .collect();

    let mut dirs = Vec::new();
    collect_matching_dirs(root, root, &glob, &exclude_matchers, &mut dirs)?;
    dirs.sort();

    Ok(dirs)
}

fn collect_matching_dirs(
    base: &Path,
    current: &Path,
    glob: &globset::GlobMatcher,
    excludes: &[globset::GlobMatcher],
    results: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(&path);

        if excludes.iter().any(|ex| ex.is_match(relative)) {
            continue;
        }

        if glob.is_match(relative) {
            results.push(path.clone());
        }

        collect_matching_dirs(base, &path, glob, excludes, results)?;
    }

    Ok(())
}
