use crate::config::ChangelogConfig;
use crate::formatter::{HeadingStyle, MarkdownSectionFormatter, SectionFormatter};
use crate::parser::Parser;
use crate::types::*;
use chrono::NaiveDate;
use std::borrow::Cow;
use version::{SemverVersion, Version};

/// One version section of a changelog.
///
/// Keeps the exact source text until it is mutated; a mutated section is
/// re-rendered on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSection {
    id: VersionId,
    date: Option<NaiveDate>,
    heading: String,
    notes: Vec<String>,
    categories: Vec<Category>,
    raw: Option<String>,
}

impl VersionSection {
    pub(crate) fn new(id: VersionId, date: Option<NaiveDate>, heading: impl Into<String>) -> Self {
        Self {
            id,
            date,
            heading: heading.into(),
            notes: Vec::new(),
            categories: Vec::new(),
            raw: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &VersionId {
        &self.id
    }

    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// The heading line as it appears in the document
    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Free text lines between the heading and the first category
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.matches(label))
    }

    #[must_use]
    pub const fn is_unreleased(&self) -> bool {
        self.id.is_unreleased()
    }

    /// Whether the section differs from its source text
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.raw.is_none()
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|category| category.entries().len()).sum()
    }

    #[must_use]
    pub fn contains_entry(&self, category: &str, text: &str) -> bool {
        self.category(category)
            .is_some_and(|category| category.contains(text))
    }

    /// Label of the first category holding an entry with exactly this text
    #[must_use]
    pub fn category_of(&self, text: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.contains(text))
            .map(Category::label)
    }

    pub(crate) fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub(crate) fn append_raw(&mut self, line: &str) {
        self.raw.get_or_insert_with(String::new).push_str(line);
    }

    pub(crate) fn push_note(&mut self, line: impl Into<String>) {
        self.notes.push(line.into());
    }

    pub(crate) fn categories_mut(&mut self) -> &mut Vec<Category> {
        &mut self.categories
    }

    /// Removes the entry with the exact text from the matching category.
    pub(crate) fn remove_entry(&mut self, category: &str, text: &str) -> Option<ChangeEntry> {
        let category = self
            .categories
            .iter_mut()
            .find(|candidate| candidate.matches(category) && candidate.contains(text))?;
        let index = category.position_of(text)?;
        let entry = category.remove(index);
        self.raw = None;
        Some(entry)
    }

    /// Appends the entry to the matching category, creating the category at its canonical rank.
    pub(crate) fn push_entry(&mut self, category: &str, entry: ChangeEntry, order: &[ChangeType]) {
        let index = match self.categories.iter().position(|c| c.matches(category)) {
            Some(index) => index,
            None => {
                let created = Category::new(category);
                let index = crate::position::find_category_insert_position(
                    &self.categories,
                    created.rank(order),
                    order,
                );
                self.categories.insert(index, created);
                index
            }
        };
        self.categories[index].push(entry);
        self.raw = None;
    }
}

/// A parsed changelog: verbatim preamble followed by ordered version sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    pub(crate) preamble: String,
    pub(crate) sections: Vec<VersionSection>,
    pub(crate) heading_style: HeadingStyle,
    pub(crate) newline: &'static str,
    pub(crate) config: ChangelogConfig,
}

impl ChangelogDocument {
    /// Parses changelog text with the default configuration.
    ///
    /// # Errors
    /// Returns an error if no version heading is found or the heading structure is invalid.
    pub fn parse(content: &str) -> Result<Self> {
        Parser::new(ChangelogConfig::default()).parse(content)
    }

    /// Parses changelog text with the given configuration.
    ///
    /// # Errors
    /// Returns an error if no version heading is found or the heading structure is invalid.
    pub fn parse_with_config(content: &str, config: &ChangelogConfig) -> Result<Self> {
        Parser::new(config.clone()).parse(content)
    }

    /// Renders the document back to text. Untouched sections are emitted byte-for-byte.
    #[must_use]
    pub fn serialize(&self) -> String {
        let formatter = MarkdownSectionFormatter::new(&self.config, self.newline);
        let mut out = String::with_capacity(
            self.preamble.len() + self.sections.iter().map(|s| s.raw().map_or(256, str::len)).sum::<usize>(),
        );
        out.push_str(&self.preamble);

        let mut previous_rendered = false;
        for section in &self.sections {
            let chunk = match section.raw() {
                Some(raw) => Cow::Borrowed(raw),
                None => Cow::Owned(formatter.format(section)),
            };
            let rendered = section.is_modified();
            if (rendered || previous_rendered) && !out.is_empty() {
                ensure_blank_line(&mut out, self.newline);
            }
            out.push_str(&chunk);
            previous_rendered = rendered;
        }

        out
    }

    #[must_use]
    pub fn sections(&self) -> &[VersionSection] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: &VersionId) -> Option<&VersionSection> {
        self.sections.iter().find(|section| section.id() == id)
    }

    #[must_use]
    pub fn unreleased(&self) -> Option<&VersionSection> {
        self.section(&VersionId::Unreleased)
    }

    pub fn published_sections(&self) -> impl Iterator<Item = &VersionSection> {
        self.sections.iter().filter(|section| !section.is_unreleased())
    }

    /// Highest version among the published sections
    #[must_use]
    pub fn last_published_version(&self) -> Option<&SemverVersion> {
        Version::max(
            self.published_sections()
                .filter_map(|section| section.id().as_published()),
        )
    }

    #[must_use]
    pub fn contains_entry(&self, id: &VersionId, category: &str, text: &str) -> bool {
        self.section(id)
            .is_some_and(|section| section.contains_entry(category, text))
    }

    #[must_use]
    pub const fn heading_style(&self) -> HeadingStyle {
        self.heading_style
    }

    #[must_use]
    pub const fn config(&self) -> &ChangelogConfig {
        &self.config
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.sections.iter().any(VersionSection::is_modified)
    }

    /// Returns an iterator over all entries as (version, category, entry)
    pub fn iter_entries(&self) -> impl Iterator<Item = (&VersionId, &str, &ChangeEntry)> + '_ {
        self.sections.iter().flat_map(|section| {
            section.categories().iter().flat_map(move |category| {
                category
                    .entries()
                    .iter()
                    .map(move |entry| (section.id(), category.label(), entry))
            })
        })
    }

    pub(crate) fn position_of(&self, id: &VersionId) -> Option<usize> {
        self.sections.iter().position(|section| section.id() == id)
    }
}

fn ensure_blank_line(out: &mut String, newline: &str) {
    if !out.ends_with('\n') {
        out.push_str(newline);
    }
    let without_last = &out[..out.len() - 1];
    let without_last = without_last.strip_suffix('\r').unwrap_or(without_last);
    if !without_last.ends_with('\n') {
        out.push_str(newline);
    }
}
