//! Line grammar of the changelog convention.
//!
//! A document is a preamble followed by version sections. Each section starts
//! with a level-two heading naming a version (or the unreleased sentinel),
//! contains level-three category headings, and each category holds unindented
//! list items. Indented lines continue the previous item.

use crate::types::ChangeType;
use once_cell::sync::Lazy;
use regex::Regex;

/// `## 1.2.0 — 2023-02-03`, `## [1.2.0] - 2023-02-03`, `## v1.2.0`
pub static VERSION_HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^##\s+(?P<open>\[)?\s*v?(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\s*\]?(?:\s*(?:—|–|-{1,2})?\s*(?P<date>\d{4}-\d{2}-\d{2}))?",
    )
    .expect("Failed to compile version header regex")
});

/// `## Unpublished`, `## [Unreleased]`, `## un-released`
pub static UNRELEASED_SECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^##\s+\[?\s*(?:unpublished|un-?released)\s*\]?\s*$")
        .expect("Failed to compile unreleased section regex")
});

/// Bare sentinel label, as accepted by `VersionId::parse`
pub static UNRELEASED_LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[?\s*(?:unpublished|un-?released)\s*\]?$")
        .expect("Failed to compile unreleased label regex")
});

pub static CHANGELOG_CATEGORY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^###\s+(?P<label>.*\S)\s*$").expect("Failed to compile category regex")
});

pub static CHANGELOG_ITEM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-*+]\s+(?P<text>.*\S)\s*$").expect("Failed to compile item regex")
});

/// Category label table, matched against `normalize_category_label` output
pub const CATEGORY_ALIASES: &[(&str, ChangeType)] = &[
    ("breaking changes", ChangeType::BreakingChanges),
    ("breaking change", ChangeType::BreakingChanges),
    ("breaking", ChangeType::BreakingChanges),
    ("new features", ChangeType::NewFeatures),
    ("new feature", ChangeType::NewFeatures),
    ("features", ChangeType::NewFeatures),
    ("added", ChangeType::NewFeatures),
    ("bug fixes", ChangeType::BugFixes),
    ("bug fix", ChangeType::BugFixes),
    ("fixes", ChangeType::BugFixes),
    ("fixed", ChangeType::BugFixes),
    ("others", ChangeType::Others),
    ("other", ChangeType::Others),
    ("other changes", ChangeType::Others),
    ("changed", ChangeType::Others),
    ("miscellaneous", ChangeType::Others),
    ("misc", ChangeType::Others),
];

/// Lowercases and strips leading emoji, punctuation and whitespace.
pub fn normalize_category_label(label: &str) -> String {
    label
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A line that continues the previous list item
pub fn is_continuation_line(line: &str) -> bool {
    line.starts_with([' ', '\t']) && !line.trim().is_empty()
}

/// Strips the line terminator (`\n` or `\r\n`) from a raw line.
pub fn strip_line_ending(raw: &str) -> &str {
    raw.strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(raw)
}
