use convoy_core::{ChangeType, ConvoyError, PrereleaseToken};
use semver::{Prerelease, Version};

/// Bumps the segment matching the change type and resets the lower
/// segments. `None` and `Dependency` leave the version untouched.
#[must_use]
pub fn bump_version(version: &Version, change: ChangeType) -> Version {
    let mut new_version = version.clone();
    new_version.pre = Prerelease::EMPTY;
    new_version.build = semver::BuildMetadata::EMPTY;

    match change {
        ChangeType::Major => {
            new_version.major += 1;
            new_version.minor = 0;
            new_version.patch = 0;
        }
        ChangeType::Minor => {
            new_version.minor += 1;
            new_version.patch = 0;
        }
        ChangeType::Patch => {
            new_version.patch += 1;
        }
        ChangeType::None | ChangeType::Dependency => {
            new_version.pre = version.pre.clone();
            new_version.build = version.build.clone();
        }
    }

    new_version
}

/// Applies a prerelease token to a computed version. Both token forms
/// end up in the prerelease component; a name replaces whatever was
/// there, a suffix is appended to the computed core version.
///
/// # Errors
///
/// Returns [`ConvoyError::InvalidPrerelease`] if the token is not a
/// valid semver prerelease identifier.
pub fn apply_prerelease(
    version: &Version,
    token: &PrereleaseToken,
) -> Result<Version, ConvoyError> {
    let identifier = token.identifier();
    let pre = Prerelease::new(identifier).map_err(|source| ConvoyError::InvalidPrerelease {
        identifier: identifier.to_string(),
        source,
    })?;

    let mut new_version = version.clone();
    new_version.pre = pre;
    Ok(new_version)
}

/// Computes the released version for one package: bump, then token.
///
/// # Errors
///
/// Returns [`ConvoyError::InvalidPrerelease`] if the token is not a
/// valid semver prerelease identifier.
pub fn next_version(
    current: &Version,
    change: ChangeType,
    token: Option<&PrereleaseToken>,
) -> Result<Version, ConvoyError> {
    let bumped = bump_version(current, change);
    match token {
        Some(token) if change > ChangeType::None => apply_prerelease(&bumped, token),
        _ => Ok(bumped),
    }
}
