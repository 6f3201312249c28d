use std::path::Path;

use semver::Version;
use toml_edit::{Item, value};

use crate::error::ManifestError;
use crate::range::refresh_range;
use crate::reader::read_document;

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn write_version(path: &Path, version: &Version) -> Result<(), ManifestError> {
    let mut doc = read_document(path)?;

    let package = doc
        .get_mut("package")
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package".to_string(),
        })?;

    let package_table = package
        .as_table_like_mut()
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package (as table)".to_string(),
        })?;

    package_table.insert("version", value(version.to_string()));

    std::fs::write(path, doc.to_string()).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Refreshes the range of one dependency in all dependency sections of
/// a manifest, preserving the range operator. String-form entries
/// (`dep = "^1.0.0"`) and table-form entries with an explicit `version`
/// key are updated; entries without a version range are left alone.
/// Returns whether anything changed.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn update_dependency_range(
    path: &Path,
    dependency_name: &str,
    new_version: &Version,
) -> Result<bool, ManifestError> {
    let mut doc = read_document(path)?;
    let mut changed = false;

    for section in &DEPENDENCY_SECTIONS {
        if let Some(deps) = doc.get_mut(section) {
            if update_dep_entry(deps, dependency_name, new_version) {
                changed = true;
            }
        }
    }

    if changed {
        std::fs::write(path, doc.to_string()).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(changed)
}

fn update_dep_entry(deps: &mut Item, dependency_name: &str, new_version: &Version) -> bool {
    let Some(deps_table) = deps.as_table_like_mut() else {
        return false;
    };

    let Some(entry) = deps_table.get_mut(dependency_name) else {
        return false;
    };

    if let Some(range) = entry.as_str() {
        let refreshed = refresh_range(range, new_version);
        *entry = value(refreshed);
        return true;
    }

    if let Some(entry_table) = entry.as_table_like_mut() {
        if let Some(version_item) = entry_table.get_mut("version") {
            if let Some(range) = version_item.as_str() {
                let refreshed = refresh_range(range, new_version);
                *version_item = value(refreshed);
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, content).expect("write manifest");
        (dir, path)
    }

    #[test]
    fn write_version_updates_package() {
        let (_dir, path) = write_manifest(
            r#"
[package]
name = "demo"
version = "1.0.0"
"#,
        );

        write_version(&path, &Version::new(2, 0, 0)).expect("write version");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("version = \"2.0.0\""));
    }

    #[test]
    fn write_version_preserves_formatting_and_comments() {
        let (_dir, path) = write_manifest(
            r#"
# release tooling reads this
[package]
name = "demo"        # the demo package
version = "1.0.0"
edition = "2024"
"#,
        );

        write_version(&path, &Version::new(1, 1, 0)).expect("write version");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("# release tooling reads this"));
        assert!(content.contains("# the demo package"));
        assert!(content.contains("edition = \"2024\""));
    }

    #[test]
    fn string_dependency_range_refreshed() {
        let (_dir, path) = write_manifest(
            r#"
[package]
name = "plugin-a"
version = "2.3.0"

[dependencies]
core = "^1.0.0"
"#,
        );

        let changed =
            update_dependency_range(&path, "core", &Version::new(2, 0, 0)).expect("update");
        assert!(changed);

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("core = \"^2.0.0\""));
    }

    #[test]
    fn table_dependency_range_refreshed_path_kept() {
        let (_dir, path) = write_manifest(
            r#"
[package]
name = "plugin-a"
version = "2.3.0"

[dependencies]
core = { path = "../core", version = "^1.0.0" }
"#,
        );

        let changed =
            update_dependency_range(&path, "core", &Version::new(2, 0, 0)).expect("update");
        assert!(changed);

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("path = \"../core\""));
        assert!(content.contains("version = \"^2.0.0\""));
    }

    #[test]
    fn dev_dependency_refreshed() {
        let (_dir, path) = write_manifest(
            r#"
[package]
name = "plugin-a"
version = "2.3.0"

[dev-dependencies]
core = "~1.2.0"
"#,
        );

        let changed =
            update_dependency_range(&path, "core", &Version::new(1, 3, 0)).expect("update");
        assert!(changed);

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("core = \"~1.3.0\""));
    }

    #[test]
    fn absent_dependency_is_no_change() {
        let (_dir, path) = write_manifest(
            r#"
[package]
name = "plugin-a"
version = "2.3.0"

[dependencies]
serde = "1"
"#,
        );

        let changed =
            update_dependency_range(&path, "core", &Version::new(2, 0, 0)).expect("update");
        assert!(!changed);
    }

    #[test]
    fn path_only_dependency_left_alone() {
        let (_dir, path) = write_manifest(
            r#"
[package]
name = "plugin-a"
version = "2.3.0"

[dependencies]
core = { path = "../core" }
"#,
        );

        let changed =
            update_dependency_range(&path, "core", &Version::new(2, 0, 0)).expect("update");
        assert!(!changed);
    }
}
