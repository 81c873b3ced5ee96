// Re-export semver for users of this library
pub use semver::Version as SemverVersion;
use std::cmp::Ordering;

mod error;
pub use error::{Result, ResultExt, VersionError};

/// Semantic version comparison used to decide which of two changelogs is ahead.
///
/// Ordering follows semver precedence: pre-release versions sort before their
/// release, build metadata is ignored.
pub struct Version;

impl Version {
    /// Parse a version string, accepting an optional leading `v`.
    ///
    /// # Errors
    /// Returns `VersionError` if the string is empty or not a valid semantic version.
    pub fn parse(version: &str) -> Result<SemverVersion> {
        let trimmed = version.trim();
        let bare = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        if bare.is_empty() {
            return Err(VersionError::Empty);
        }

        SemverVersion::parse(bare)
            .with_context(|| format!("Failed to parse version string: '{version}'"))
    }

    #[must_use]
    pub fn compare(a: &SemverVersion, b: &SemverVersion) -> Ordering {
        a.cmp_precedence(b)
    }

    /// `a > b`
    #[must_use]
    pub fn gt(a: &SemverVersion, b: &SemverVersion) -> bool {
        Self::compare(a, b) == Ordering::Greater
    }

    /// `a == b`, ignoring build metadata
    #[must_use]
    pub fn eq(a: &SemverVersion, b: &SemverVersion) -> bool {
        Self::compare(a, b) == Ordering::Equal
    }

    /// `a <= b`
    #[must_use]
    pub fn lte(a: &SemverVersion, b: &SemverVersion) -> bool {
        Self::compare(a, b) != Ordering::Greater
    }

    /// Highest version of the iterator, if any.
    pub fn max<'a, I>(versions: I) -> Option<&'a SemverVersion>
    where
        I: IntoIterator<Item = &'a SemverVersion>,
    {
        versions
            .into_iter()
            .max_by(|a, b| Self::compare(a, b))
    }
}
