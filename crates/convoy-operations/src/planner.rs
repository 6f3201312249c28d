use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use chrono::NaiveDate;
use convoy_changelog::ChangelogEntry;
use convoy_core::{ChangeRequest, ChangeType, PackageInfo, PrereleaseToken};
use convoy_project::Project;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::traits::{ChangeStore, ChangelogStore, ManifestStore};
use crate::types::{ChangeInfo, PlannedEdit};
use crate::{OperationError, Result};

/// Aggregates pending change requests into a dependency-consistent,
/// topologically ordered cascade of per-package release decisions, and
/// applies them to manifests and changelogs.
pub struct ChangeManager {
    /// Ordered change list: a package always appears after all packages
    /// it depends on.
    changes: Vec<ChangeInfo>,
    unknown_packages: Vec<String>,
    /// Request file -> target package, for consumption after apply.
    request_files: Vec<(PathBuf, String)>,
    packages: IndexMap<String, PackageInfo>,
    include_commit_details: bool,
}

impl ChangeManager {
    /// Reads every pending change request and computes the cascade.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or version computation
    /// fails. A request naming an unknown package is skipped, not
    /// fatal.
    pub fn load(
        project: &Project,
        store: &dyn ChangeStore,
        prerelease: Option<&PrereleaseToken>,
        include_commit_details: bool,
    ) -> Result<Self> {
        let mut requests = Vec::new();
        for path in store.list()? {
            let request = store.read(&path)?;
            requests.push((path, request));
        }

        Self::from_requests(project, requests, prerelease, include_commit_details)
    }

    /// Computes the cascade from already-loaded requests.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::DependencyCycle`] if the changed
    /// packages cannot be ordered, or an error if a computed version is
    /// invalid.
    pub fn from_requests(
        project: &Project,
        requests: Vec<(PathBuf, ChangeRequest)>,
        prerelease: Option<&PrereleaseToken>,
        include_commit_details: bool,
    ) -> Result<Self> {
        let packages: IndexMap<String, PackageInfo> = project
            .packages
            .iter()
            .map(|p| (p.name.clone(), p.clone()))
            .collect();

        let mut unknown_packages = Vec::new();
        let mut request_files = Vec::new();
        let mut requests_by_package: IndexMap<String, Vec<ChangeRequest>> = IndexMap::new();

        for (path, request) in requests {
            if packages.contains_key(&request.package) {
                request_files.push((path, request.package.clone()));
                requests_by_package
                    .entry(request.package.clone())
                    .or_default()
                    .push(request);
            } else {
                warn!(
                    package = %request.package,
                    file = %path.display(),
                    "change request names an unknown package; skipping"
                );
                if !unknown_packages.contains(&request.package) {
                    unknown_packages.push(request.package);
                }
            }
        }

        let resolved = propagate_change_types(&packages, &requests_by_package);
        let ordered = topological_order(&packages, &resolved)?;

        let mut changes = Vec::new();
        for name in ordered {
            let package = &packages[&name];
            let change = resolved[&name];
            let new_version = convoy_version::next_version(&package.version, change, prerelease)?;

            changes.push(ChangeInfo {
                name: name.clone(),
                change,
                current_version: package.version.clone(),
                new_version,
                requests: requests_by_package.shift_remove(&name).unwrap_or_default(),
            });
        }

        debug!(
            changed = changes.len(),
            unknown = unknown_packages.len(),
            "computed change cascade"
        );

        Ok(Self {
            changes,
            unknown_packages,
            request_files,
            packages,
            include_commit_details,
        })
    }

    /// Whether any package has a resolved change above `None`.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The ordered change list.
    #[must_use]
    pub fn changes(&self) -> &[ChangeInfo] {
        &self.changes
    }

    #[must_use]
    pub fn change(&self, name: &str) -> Option<&ChangeInfo> {
        self.changes.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn unknown_packages(&self) -> &[String] {
        &self.unknown_packages
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.get(name)
    }

    /// Applies version and dependency-range edits. When `write` is
    /// false this is a dry run: the intended edits are returned without
    /// touching disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest write fails.
    pub fn apply(&self, manifests: &dyn ManifestStore, write: bool) -> Result<Vec<PlannedEdit>> {
        let mut edits = Vec::new();

        for info in &self.changes {
            let package = &self.packages[&info.name];

            if info.new_version != info.current_version {
                edits.push(PlannedEdit::SetVersion {
                    package: info.name.clone(),
                    version: info.new_version.clone(),
                });
                if write {
                    manifests.write_version(package, &info.new_version)?;
                }
            }

            for dependency in package.dependencies.keys() {
                let Some(dep_info) = self.change(dependency) else {
                    continue;
                };
                if !dep_info.requires_publish() {
                    continue;
                }

                edits.push(PlannedEdit::UpdateDependency {
                    package: info.name.clone(),
                    dependency: dependency.clone(),
                    version: dep_info.new_version.clone(),
                });
                if write {
                    manifests.update_dependency_range(package, dependency, &dep_info.new_version)?;
                }
            }
        }

        Ok(edits)
    }

    /// Appends one changelog release per changed package, carrying
    /// author/commit metadata when configured. Honors the same dry-run
    /// contract as [`Self::apply`].
    ///
    /// # Errors
    ///
    /// Returns an error if a changelog write fails.
    pub fn update_changelogs(
        &self,
        changelogs: &dyn ChangelogStore,
        write: bool,
        today: NaiveDate,
    ) -> Result<Vec<(String, usize)>> {
        let mut written = Vec::new();

        for info in &self.changes {
            let package = &self.packages[&info.name];
            let entries = self.changelog_entries(info, today);
            written.push((info.name.clone(), entries.len()));

            if write {
                changelogs.append(package, entries)?;
            }
        }

        Ok(written)
    }

    fn changelog_entries(&self, info: &ChangeInfo, today: NaiveDate) -> Vec<ChangelogEntry> {
        let mut entries = Vec::new();

        for request in &info.requests {
            let mut entry = ChangelogEntry::new(
                info.new_version.clone(),
                request.change,
                request.comment.clone(),
                today,
            );
            if self.include_commit_details {
                if let Some(author) = &request.author {
                    entry = entry.with_author(author.clone());
                }
                if let Some(commit) = &request.commit {
                    entry = entry.with_commit(commit.clone());
                }
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            let refreshed: Vec<String> = self.packages[&info.name]
                .dependencies
                .keys()
                .filter_map(|dep| {
                    self.change(dep)
                        .filter(|d| d.requires_publish())
                        .map(|d| format!("{} {}", d.name, d.new_version))
                })
                .collect();

            entries.push(ChangelogEntry::new(
                info.new_version.clone(),
                ChangeType::Dependency,
                format!("Updated dependencies: {}", refreshed.join(", ")),
                today,
            ));
        }

        entries
    }

    /// Deletes the change request files backing the applied packages.
    /// Files are deleted only when `write` is true, so machine state
    /// never runs ahead of manifest state; files for unknown packages
    /// are always left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a deletion fails.
    pub fn consume_requests(
        &self,
        store: &dyn ChangeStore,
        write: bool,
    ) -> Result<Vec<PathBuf>> {
        let mut consumed = Vec::new();

        for (path, package) in &self.request_files {
            if self.change(package).is_none() {
                continue;
            }
            if write {
                store.delete(path)?;
            }
            consumed.push(path.clone());
        }

        Ok(consumed)
    }
}

/// Seeds each package with the maximum explicit change type from its
/// requests and propagates `Dependency` elevation to a fixed point
/// across the dependent graph. Each package is elevated at most once,
/// so the worklist terminates on any graph, including multi-level
/// chains.
fn propagate_change_types(
    packages: &IndexMap<String, PackageInfo>,
    requests_by_package: &IndexMap<String, Vec<ChangeRequest>>,
) -> IndexMap<String, ChangeType> {
    let mut resolved: IndexMap<String, ChangeType> = packages
        .keys()
        .map(|name| (name.clone(), ChangeType::None))
        .collect();

    for (name, requests) in requests_by_package {
        let seeded = requests
            .iter()
            .map(|r| r.change)
            .max()
            .unwrap_or(ChangeType::None);
        resolved[name] = seeded;
    }

    let dependents = dependent_index(packages);

    let mut queue: VecDeque<String> = resolved
        .iter()
        .filter(|(_, change)| **change > ChangeType::None)
        .map(|(name, _)| name.clone())
        .collect();

    while let Some(name) = queue.pop_front() {
        let Some(deps) = dependents.get(&name) else {
            continue;
        };
        for dependent in deps {
            if resolved[dependent] == ChangeType::None {
                resolved[dependent] = ChangeType::Dependency;
                queue.push_back(dependent.clone());
            }
        }
    }

    resolved
}

/// Workspace-internal reverse edges: dependency name -> dependents.
fn dependent_index(packages: &IndexMap<String, PackageInfo>) -> IndexMap<String, Vec<String>> {
    let mut dependents: IndexMap<String, Vec<String>> = IndexMap::new();

    for package in packages.values() {
        for dependency in package.dependencies.keys() {
            if dependency != &package.name && packages.contains_key(dependency) {
                dependents
                    .entry(dependency.clone())
                    .or_default()
                    .push(package.name.clone());
            }
        }
    }

    dependents
}

/// Kahn's algorithm over the changed subgraph, deterministic in package
/// discovery order. Dependencies come out before their dependents.
fn topological_order(
    packages: &IndexMap<String, PackageInfo>,
    resolved: &IndexMap<String, ChangeType>,
) -> Result<Vec<String>> {
    let changed: Vec<&String> = packages
        .keys()
        .filter(|name| resolved[*name] > ChangeType::None)
        .collect();
    let changed_set: HashSet<&str> = changed.iter().map(|n| n.as_str()).collect();

    let mut indegree: IndexMap<&str, usize> = changed
        .iter()
        .map(|name| {
            let count = packages[*name]
                .dependencies
                .keys()
                .filter(|dep| dep.as_str() != name.as_str() && changed_set.contains(dep.as_str()))
                .count();
            (name.as_str(), count)
        })
        .collect();

    let dependents = dependent_index(packages);

    let mut ready: VecDeque<&str> = indegree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut order = Vec::new();
    while let Some(name) = ready.pop_front() {
        order.push(name.to_string());

        let Some(deps) = dependents.get(name) else {
            continue;
        };
        for dependent in deps {
            if let Some(degree) = indegree.get_mut(dependent.as_str()) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(dependent.as_str());
                }
            }
        }
    }

    if order.len() != changed.len() {
        let stuck: Vec<String> = indegree
            .iter()
            .filter(|(_, degree)| **degree > 0)
            .map(|(name, _)| (*name).to_string())
            .collect();
        return Err(OperationError::DependencyCycle { packages: stuck });
    }

    Ok(order)
}
