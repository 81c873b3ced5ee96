use crate::document::{ChangelogDocument, VersionSection};
use crate::error::ChangelogError;
use crate::formatter::create_header_formatter;
use crate::position::find_section_insert_position;
use crate::types::{ChangeEntry, Result, VersionId};
use chrono::NaiveDate;
use tracing::debug;

/// Options for entries landing in a version section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOptions {
    /// Release date recorded when the destination section has to be created
    pub release_date: Option<NaiveDate>,
}

impl ChangelogDocument {
    /// Moves `entry` from the `category` of version `from` into version `to`.
    ///
    /// The destination section is created at its newest-first position when
    /// missing, and the category at its canonical position.
    ///
    /// # Errors
    /// `MissingSection` when `from` does not exist, `EntryNotFound` when the
    /// exact entry is not filed under `category` in `from`.
    pub fn move_entry(
        &mut self,
        from: &VersionId,
        to: &VersionId,
        category: &str,
        entry: &ChangeEntry,
        options: MoveOptions,
    ) -> Result<()> {
        self.refile_entry(from, category, to, category, entry, options)
    }

    /// Like [`move_entry`](Self::move_entry), but files the entry under
    /// `to_category` when the two versions classify it differently.
    ///
    /// # Errors
    /// `MissingSection` when `from` does not exist, `EntryNotFound` when the
    /// exact entry is not filed under `from_category` in `from`.
    pub fn refile_entry(
        &mut self,
        from: &VersionId,
        from_category: &str,
        to: &VersionId,
        to_category: &str,
        entry: &ChangeEntry,
        options: MoveOptions,
    ) -> Result<()> {
        let from_index = self
            .position_of(from)
            .ok_or_else(|| ChangelogError::MissingSection(from.to_string()))?;

        self.sections[from_index]
            .remove_entry(from_category, entry.text())
            .ok_or_else(|| ChangelogError::EntryNotFound {
                version: from.to_string(),
                category: from_category.to_string(),
                entry: entry.text().to_string(),
            })?;

        debug!(%from, %to, from_category, to_category, entry = entry.text(), "moving changelog entry");
        self.insert_entry(to, to_category, entry, options)
    }

    /// Appends `entry` to the `category` of version `to`, creating the section
    /// and category when missing.
    ///
    /// # Errors
    /// Returns an error if the destination section cannot be created.
    pub fn insert_entry(
        &mut self,
        to: &VersionId,
        category: &str,
        entry: &ChangeEntry,
        options: MoveOptions,
    ) -> Result<()> {
        let index = self.ensure_section(to, options)?;
        let order = self.config.category_order.clone();
        self.sections[index].push_entry(category, entry.clone(), &order);
        Ok(())
    }

    fn ensure_section(&mut self, id: &VersionId, options: MoveOptions) -> Result<usize> {
        if let Some(index) = self.position_of(id) {
            return Ok(index);
        }

        let header_formatter = create_header_formatter(self.heading_style);
        let (index, section) = match id {
            VersionId::Unreleased => (
                0,
                VersionSection::new(VersionId::Unreleased, None, header_formatter.format_unreleased()),
            ),
            VersionId::Published(version) => {
                let date = options
                    .release_date
                    .map(|date| date.format(&self.config.date_format).to_string());
                let heading = header_formatter.format(version, date.as_deref());
                (
                    find_section_insert_position(&self.sections, version),
                    VersionSection::new(id.clone(), options.release_date, heading),
                )
            }
        };

        debug!(version = %id, position = index, "creating version section");
        self.sections.insert(index, section);
        Ok(index)
    }
}
