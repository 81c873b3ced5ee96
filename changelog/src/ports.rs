//! Collaborators the sync orchestrator depends on. Implementations live in the
//! binary; tests use in-memory doubles.

use crate::types::Result;
use std::path::{Path, PathBuf};

/// Read access to files at arbitrary revisions of the repository.
pub trait VersionControl {
    /// Reads `path` (relative to the repository root) as it exists at `reference`.
    ///
    /// # Errors
    /// Returns `ChangelogError::NotFound` when the reference or path does not resolve.
    fn read_file(&self, reference: &str, path: &Path) -> Result<String>;

    /// Updates the remote-tracking reference of `branch` before reading from it.
    ///
    /// # Errors
    /// Returns an error if the remote cannot be fetched.
    fn fetch(&self, _remote: &str, _branch: &str) -> Result<()> {
        Ok(())
    }
}

/// A workspace package owning a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Changelog path relative to the repository root, used for revision lookups
    pub changelog_path: PathBuf,
    /// Changelog path in the working tree
    pub local_changelog_path: PathBuf,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        changelog_path: impl Into<PathBuf>,
        local_changelog_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            changelog_path: changelog_path.into(),
            local_changelog_path: local_changelog_path.into(),
        }
    }

    #[must_use]
    pub fn has_changelog(&self) -> bool {
        self.local_changelog_path.is_file()
    }
}

/// Enumerates the packages of the workspace.
pub trait PackageRepository {
    /// # Errors
    /// Returns an error if the workspace layout cannot be read.
    fn list_packages(&self) -> Result<Vec<Package>>;
}
