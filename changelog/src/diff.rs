use crate::document::ChangelogDocument;
use crate::error::ChangelogError;
use crate::types::{ChangeEntry, Result, VersionId};
use chrono::NaiveDate;
use version::{SemverVersion, Version};

/// Entries of one category within a `ChangeSet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChanges {
    pub category: String,
    pub entries: Vec<ChangeEntry>,
}

/// Entries of one version within a `ChangeSet`, with the version's release date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChanges {
    pub version: VersionId,
    pub date: Option<NaiveDate>,
    pub categories: Vec<CategoryChanges>,
}

impl VersionChanges {
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    #[must_use]
    pub fn category(&self, label: &str) -> Option<&CategoryChanges> {
        self.categories.iter().find(|c| c.category == label)
    }
}

/// Entries published in the source but not yet in the target, ordered by
/// version (document order), then category, then entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    versions: Vec<VersionChanges>,
    total_count: usize,
}

impl ChangeSet {
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    #[must_use]
    pub fn versions(&self) -> &[VersionChanges] {
        &self.versions
    }

    #[must_use]
    pub fn get(&self, version: &VersionId) -> Option<&VersionChanges> {
        self.versions.iter().find(|changes| &changes.version == version)
    }

    #[must_use]
    pub fn release_date(&self, version: &VersionId) -> Option<NaiveDate> {
        self.get(version).and_then(|changes| changes.date)
    }

    /// Entries of one version and category, empty if absent
    #[must_use]
    pub fn entries(&self, version: &VersionId, category: &str) -> &[ChangeEntry] {
        self.get(version)
            .and_then(|changes| changes.category(category))
            .map(|category| category.entries.as_slice())
            .unwrap_or_default()
    }

    pub fn remove(&mut self, version: &VersionId) -> Option<VersionChanges> {
        let index = self.versions.iter().position(|c| &c.version == version)?;
        let removed = self.versions.remove(index);
        self.total_count -= removed.entry_count();
        Some(removed)
    }

    /// Iterates (version, category, entry) in application order
    pub fn iter_entries(&self) -> impl Iterator<Item = (&VersionChanges, &str, &ChangeEntry)> + '_ {
        self.versions.iter().flat_map(|version| {
            version.categories.iter().flat_map(move |category| {
                category
                    .entries
                    .iter()
                    .map(move |entry| (version, category.category.as_str(), entry))
            })
        })
    }

    fn push(&mut self, changes: VersionChanges) {
        self.total_count += changes.entry_count();
        self.versions.push(changes);
    }
}

/// Collects the published sections of `source` with `after < version <= upto`.
///
/// The unreleased section is never part of the result. An empty range yields an
/// empty `ChangeSet`.
///
/// # Errors
/// Returns `InvalidRange` unless `after < upto`.
pub fn compute_changes(
    source: &ChangelogDocument,
    after: &SemverVersion,
    upto: &SemverVersion,
) -> Result<ChangeSet> {
    if !Version::gt(upto, after) {
        return Err(ChangelogError::InvalidRange {
            after: after.to_string(),
            upto: upto.to_string(),
        });
    }

    let mut changes = ChangeSet::default();

    for section in source.published_sections() {
        let Some(version) = section.id().as_published() else {
            continue;
        };
        if !Version::gt(version, after) || !Version::lte(version, upto) {
            continue;
        }

        let categories: Vec<CategoryChanges> = section
            .categories()
            .iter()
            .filter(|category| !category.is_empty())
            .map(|category| CategoryChanges {
                category: category.label().to_string(),
                entries: category.entries().to_vec(),
            })
            .collect();

        changes.push(VersionChanges {
            version: section.id().clone(),
            date: section.date(),
            categories,
        });
    }

    Ok(changes)
}
