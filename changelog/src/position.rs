use crate::document::VersionSection;
use crate::types::{Category, ChangeType, category_rank};
use std::cmp::Ordering;
use version::{SemverVersion, Version};

/// Index at which a new published section keeps the document newest-first:
/// before the first older published section, after unreleased and newer ones.
pub fn find_section_insert_position(sections: &[VersionSection], version: &SemverVersion) -> usize {
    sections
        .iter()
        .position(|section| {
            section
                .id()
                .as_published()
                .is_some_and(|existing| Version::compare(existing, version) == Ordering::Less)
        })
        .unwrap_or(sections.len())
}

/// Index at which a category of the given rank is inserted: after every
/// category ranked at or before it.
pub fn find_category_insert_position(
    categories: &[Category],
    rank: usize,
    order: &[ChangeType],
) -> usize {
    categories
        .iter()
        .position(|category| category_rank(category.kind(), order) > rank)
        .unwrap_or(categories.len())
}
