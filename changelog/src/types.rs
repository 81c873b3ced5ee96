use crate::error::ChangelogError;
use crate::utils::{CATEGORY_ALIASES, UNRELEASED_LABEL_PATTERN, normalize_category_label};
use std::cmp::Ordering;
use std::fmt;
use version::{SemverVersion, Version};

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// Key used for the unreleased section in messages and logs
pub const UNRELEASED_VERSION_NAME: &str = "unreleased";

/// Identifies a version section: either the unreleased sentinel or a published version.
#[derive(Debug, Clone)]
pub enum VersionId {
    Unreleased,
    Published(SemverVersion),
}

impl VersionId {
    /// Parses a version identifier; any spelling of the sentinel label maps to `Unreleased`.
    ///
    /// # Errors
    /// Returns an error if the text is neither the sentinel nor a semantic version.
    pub fn parse(text: &str) -> Result<Self> {
        if UNRELEASED_LABEL_PATTERN.is_match(text.trim()) {
            return Ok(Self::Unreleased);
        }
        Ok(Self::Published(Version::parse(text)?))
    }

    #[must_use]
    pub const fn is_unreleased(&self) -> bool {
        matches!(self, Self::Unreleased)
    }

    #[must_use]
    pub const fn as_published(&self) -> Option<&SemverVersion> {
        match self {
            Self::Unreleased => None,
            Self::Published(version) => Some(version),
        }
    }
}

impl From<SemverVersion> for VersionId {
    fn from(version: SemverVersion) -> Self {
        Self::Published(version)
    }
}

impl PartialEq for VersionId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionId {}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Unreleased sorts above every published version.
impl Ord for VersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unreleased, Self::Unreleased) => Ordering::Equal,
            (Self::Unreleased, Self::Published(_)) => Ordering::Greater,
            (Self::Published(_), Self::Unreleased) => Ordering::Less,
            (Self::Published(a), Self::Published(b)) => Version::compare(a, b),
        }
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreleased => f.write_str(UNRELEASED_VERSION_NAME),
            Self::Published(version) => write!(f, "{version}"),
        }
    }
}

/// The fixed classification of change entries, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    BreakingChanges,
    NewFeatures,
    BugFixes,
    Others,
}

impl ChangeType {
    pub const ALL: [Self; 4] = [
        Self::BreakingChanges,
        Self::NewFeatures,
        Self::BugFixes,
        Self::Others,
    ];

    /// Heading label used when a category has to be created from scratch
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BreakingChanges => "🛠 Breaking changes",
            Self::NewFeatures => "🎉 New features",
            Self::BugFixes => "🐛 Bug fixes",
            Self::Others => "💡 Others",
        }
    }

    /// Recognizes a category heading, ignoring case and leading emoji.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = normalize_category_label(label);
        CATEGORY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, change_type)| *change_type)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single change line. Identity is the exact text; `details` holds indented
/// continuation lines (nested bullets, wrapped text) kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    text: String,
    details: Vec<String>,
}

impl ChangeEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub(crate) fn push_detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A category heading of a version section and its entries.
///
/// Free text inside the category is kept on the side of the list it was
/// found on; text between two entries trails the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    label: String,
    kind: Option<ChangeType>,
    leading_notes: Vec<String>,
    entries: Vec<ChangeEntry>,
    trailing_notes: Vec<String>,
}

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into().trim().to_string();
        let kind = ChangeType::from_label(&label);
        Self {
            label,
            kind,
            leading_notes: Vec::new(),
            entries: Vec::new(),
            trailing_notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn kind(&self) -> Option<ChangeType> {
        self.kind
    }

    #[must_use]
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    #[must_use]
    pub fn leading_notes(&self) -> &[String] {
        &self.leading_notes
    }

    #[must_use]
    pub fn trailing_notes(&self) -> &[String] {
        &self.trailing_notes
    }

    /// No entries; notes do not count
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn has_notes(&self) -> bool {
        !self.leading_notes.is_empty() || !self.trailing_notes.is_empty()
    }

    /// Same label, or both labels name the same known change type.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        let label = label.trim();
        if self.label == label {
            return true;
        }
        self.kind.is_some() && self.kind == ChangeType::from_label(label)
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.position_of(text).is_some()
    }

    /// Position in the given canonical order; unknown categories go last.
    #[must_use]
    pub fn rank(&self, order: &[ChangeType]) -> usize {
        category_rank(self.kind, order)
    }

    pub(crate) fn position_of(&self, text: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.text == text)
    }

    pub(crate) fn push(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn remove(&mut self, index: usize) -> ChangeEntry {
        self.entries.remove(index)
    }

    pub(crate) fn push_note(&mut self, line: impl Into<String>) {
        if self.entries.is_empty() {
            self.leading_notes.push(line.into());
        } else {
            self.trailing_notes.push(line.into());
        }
    }

    pub(crate) fn last_entry_mut(&mut self) -> Option<&mut ChangeEntry> {
        self.entries.last_mut()
    }
}

pub(crate) fn category_rank(kind: Option<ChangeType>, order: &[ChangeType]) -> usize {
    kind.and_then(|kind| order.iter().position(|known| *known == kind))
        .unwrap_or(order.len())
}
