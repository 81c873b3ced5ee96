use crate::config::ChangelogConfig;
use crate::document::VersionSection;
use crate::types::Category;
use version::SemverVersion;

// --- Traits ---

pub trait HeaderFormatter: Send + Sync {
    fn format(&self, version: &SemverVersion, date: Option<&str>) -> String;
    fn format_unreleased(&self) -> String;
}

pub trait SectionFormatter {
    fn format(&self, section: &VersionSection) -> String;
}

/// How version headings of a document are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// `## 1.2.0 — 2023-02-03`
    #[default]
    Plain,
    /// `## [1.2.0] - 2023-02-03`
    Bracketed,
}

// Header Formatters
#[derive(Debug, Clone)]
pub struct PlainHeaderFormatter;

impl HeaderFormatter for PlainHeaderFormatter {
    fn format(&self, version: &SemverVersion, date: Option<&str>) -> String {
        match date {
            Some(date) => format!("## {version} — {date}"),
            None => format!("## {version}"),
        }
    }

    fn format_unreleased(&self) -> String {
        "## Unpublished".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct BracketedHeaderFormatter;

impl HeaderFormatter for BracketedHeaderFormatter {
    fn format(&self, version: &SemverVersion, date: Option<&str>) -> String {
        match date {
            Some(date) => format!("## [{version}] - {date}"),
            None => format!("## [{version}]"),
        }
    }

    fn format_unreleased(&self) -> String {
        "## [Unreleased]".to_string()
    }
}

#[must_use]
pub fn create_header_formatter(style: HeadingStyle) -> Box<dyn HeaderFormatter> {
    match style {
        HeadingStyle::Plain => Box::new(PlainHeaderFormatter),
        HeadingStyle::Bracketed => Box::new(BracketedHeaderFormatter),
    }
}

/// Renders a mutated section: heading, notes, then every category with entries or notes,
/// blocks separated by one blank line.
#[derive(Debug, Clone)]
pub struct MarkdownSectionFormatter<'a> {
    config: &'a ChangelogConfig,
    newline: &'a str,
}

impl<'a> MarkdownSectionFormatter<'a> {
    pub fn new(config: &'a ChangelogConfig, newline: &'a str) -> Self {
        Self { config, newline }
    }

    fn is_visible(&self, section: &VersionSection, category: &Category) -> bool {
        !category.is_empty()
            || category.has_notes()
            || (section.is_unreleased() && self.config.preserve_unreleased_template)
    }

    fn format_notes(&self, notes: &[String]) -> String {
        let mut block = notes.join(self.newline);
        block.push_str(self.newline);
        block
    }

    fn format_category(&self, category: &Category) -> String {
        let nl = self.newline;
        let mut parts = Vec::with_capacity(3);
        if !category.leading_notes().is_empty() {
            parts.push(self.format_notes(category.leading_notes()));
        }
        if !category.is_empty() {
            let mut list = String::with_capacity(category.entries().len() * 80);
            for entry in category.entries() {
                list.push_str("- ");
                list.push_str(entry.text());
                list.push_str(nl);
                for detail in entry.details() {
                    list.push_str(detail);
                    list.push_str(nl);
                }
            }
            parts.push(list);
        }
        if !category.trailing_notes().is_empty() {
            parts.push(self.format_notes(category.trailing_notes()));
        }

        let mut block = format!("### {}{nl}", category.label());
        if !parts.is_empty() {
            block.push_str(nl);
            block.push_str(&parts.join(nl));
        }
        block
    }
}

impl SectionFormatter for MarkdownSectionFormatter<'_> {
    fn format(&self, section: &VersionSection) -> String {
        let nl = self.newline;
        let mut blocks = Vec::with_capacity(section.categories().len() + 1);

        if !section.notes().is_empty() {
            blocks.push(self.format_notes(section.notes()));
        }
        blocks.extend(
            section
                .categories()
                .iter()
                .filter(|category| self.is_visible(section, category))
                .map(|category| self.format_category(category)),
        );

        let mut formatted = String::with_capacity(1024);
        formatted.push_str(section.heading());
        formatted.push_str(nl);
        if !blocks.is_empty() {
            formatted.push_str(nl);
            formatted.push_str(&blocks.join(nl));
        }
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeEntry, ChangeType, VersionId};
    use chrono::NaiveDate;
    use version::Version;

    fn section_with_entries() -> VersionSection {
        let mut section = VersionSection::new(
            VersionId::parse("1.2.0").unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 3),
            "## 1.2.0 — 2023-02-03",
        );
        let order = ChangeType::ALL;
        section.push_entry("🐛 Bug fixes", ChangeEntry::new("Fixed X."), &order);
        section.push_entry(
            "🛠 Breaking changes",
            ChangeEntry::new("Removed Y.").with_details(vec!["  - Use Z instead.".to_string()]),
            &order,
        );
        section
    }

    #[test]
    fn test_header_formatters() {
        let version = Version::parse("1.2.0").unwrap();
        let plain = create_header_formatter(HeadingStyle::Plain);
        assert_eq!(plain.format(&version, Some("2023-02-03")), "## 1.2.0 — 2023-02-03");
        assert_eq!(plain.format(&version, None), "## 1.2.0");
        assert_eq!(plain.format_unreleased(), "## Unpublished");

        let bracketed = create_header_formatter(HeadingStyle::Bracketed);
        assert_eq!(bracketed.format(&version, Some("2023-02-03")), "## [1.2.0] - 2023-02-03");
        assert_eq!(bracketed.format_unreleased(), "## [Unreleased]");
    }

    #[test]
    fn test_section_rendered_in_canonical_order() {
        let config = ChangelogConfig::default();
        let formatter = MarkdownSectionFormatter::new(&config, "\n");

        assert_eq!(
            formatter.format(&section_with_entries()),
            "## 1.2.0 — 2023-02-03\n\n### 🛠 Breaking changes\n\n- Removed Y.\n  - Use Z instead.\n\n### 🐛 Bug fixes\n\n- Fixed X.\n"
        );
    }

    #[test]
    fn test_empty_categories_are_dropped() {
        let config = ChangelogConfig::default();
        let formatter = MarkdownSectionFormatter::new(&config, "\n");
        let mut section = section_with_entries();
        section.remove_entry("🐛 Bug fixes", "Fixed X.").unwrap();

        let output = formatter.format(&section);
        assert!(!output.contains("Bug fixes"));
    }

    #[test]
    fn test_unreleased_template_preserved_when_configured() {
        let config = ChangelogConfig {
            preserve_unreleased_template: true,
            ..ChangelogConfig::default()
        };
        let formatter = MarkdownSectionFormatter::new(&config, "\n");
        let mut section = VersionSection::new(VersionId::Unreleased, None, "## Unpublished");
        section.push_entry("🐛 Bug fixes", ChangeEntry::new("Fixed X."), &ChangeType::ALL);
        section.push_entry("🎉 New features", ChangeEntry::new("Added Y."), &ChangeType::ALL);
        section.remove_entry("🐛 Bug fixes", "Fixed X.").unwrap();

        assert_eq!(
            formatter.format(&section),
            "## Unpublished\n\n### 🎉 New features\n\n- Added Y.\n\n### 🐛 Bug fixes\n"
        );
    }

    #[test]
    fn test_notes_render_before_categories() {
        let config = ChangelogConfig::default();
        let formatter = MarkdownSectionFormatter::new(&config, "\n");
        let mut section = VersionSection::new(VersionId::parse("1.0.0").unwrap(), None, "## 1.0.0");
        section.push_note("_Initial release._");

        assert_eq!(formatter.format(&section), "## 1.0.0\n\n_Initial release._\n");
    }
}
