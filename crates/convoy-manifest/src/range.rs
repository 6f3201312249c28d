use semver::Version;

/// Rewrites a dependency range to point at a new version while keeping
/// the original range operator. `^1.0.0` becomes `^2.0.0`, `~1.2.0`
/// becomes `~2.0.0`, `=1.0.0` becomes `=2.0.0`, and a bare `1.0.0`
/// becomes `2.0.0`.
#[must_use]
pub fn refresh_range(range: &str, new_version: &Version) -> String {
    let trimmed = range.trim();
    if trimmed.contains(',') {
        // Compound requirements are replaced by a caret range on the
        // new version; the old expression cannot be meaningfully
        // preserved once its anchor version is gone.
        return format!("^{new_version}");
    }

    let operator = trimmed
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .collect::<String>();

    match operator.trim() {
        op @ ("^" | "~" | "=" | ">=" | "") => format!("{op}{new_version}"),
        _ => format!("^{new_version}"),
    }
}
