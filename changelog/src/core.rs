use crate::config::ChangelogConfig;
use crate::document::ChangelogDocument;
use crate::error::ChangelogError;
use crate::types::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A changelog file on disk together with its parsed document
#[derive(Debug, Clone)]
pub struct Changelog {
    path: PathBuf,
    document: ChangelogDocument,
}

impl Changelog {
    /// Reads and parses the changelog at `path`.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn open(path: impl Into<PathBuf>, config: &ChangelogConfig) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let document = ChangelogDocument::parse_with_config(&content, config)
            .map_err(|e| e.with_context(path.display().to_string()))?;

        Ok(Self { path, document })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn document(&self) -> &ChangelogDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ChangelogDocument {
        &mut self.document
    }

    /// Writes the document back, replacing the file atomically. Nothing is
    /// written when the document was not modified.
    ///
    /// # Errors
    /// Returns error if the temporary file cannot be written or renamed over the original
    pub fn save(&self) -> Result<bool> {
        if !self.document.is_modified() {
            return Ok(false);
        }

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(self.document.serialize().as_bytes())?;
        temp_file.as_file().sync_all()?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            fs::set_permissions(temp_file.path(), metadata.permissions())?;
        }

        temp_file
            .persist(&self.path)
            .map_err(|e| ChangelogError::Io(e.error))?;
        debug!(path = %self.path.display(), "changelog written");
        Ok(true)
    }
}
