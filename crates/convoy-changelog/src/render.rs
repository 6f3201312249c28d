use std::fmt::Write;

use crate::store::Changelog;

const CHANGELOG_HEADER: &str = r"All notable changes to this package are documented in this file.
This file is generated from CHANGELOG.toml; do not edit it by hand.
";

/// Renders the full markdown changelog for one package, newest release
/// first, one section per version in data-file order.
#[must_use]
pub fn render_markdown(package_name: &str, changelog: &Changelog) -> String {
    let mut output = format!("# Changelog - {package_name}\n\n{CHANGELOG_HEADER}");

    let mut current_version: Option<&semver::Version> = None;

    for entry in &changelog.entries {
        if current_version != Some(&entry.version) {
            let _ = write!(output, "\n## {} - {}\n", entry.version, entry.date);
            current_version = Some(&entry.version);
        }

        output.push_str("\n- ");
        if entry.comment.is_empty() {
            let _ = write!(output, "{} release", entry.change);
        } else {
            output.push_str(&entry.comment);
        }
        match (&entry.author, &entry.commit) {
            (Some(author), Some(commit)) => {
                let _ = write!(output, " ({author}, {commit})");
            }
            (Some(author), None) => {
                let _ = write!(output, " ({author})");
            }
            (None, Some(commit)) => {
                let _ = write!(output, " ({commit})");
            }
            (None, None) => {}
        }
        output.push('\n');
    }

    output
}
