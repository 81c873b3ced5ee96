use crate::config::ChangelogConfig;
use crate::document::{ChangelogDocument, VersionSection};
use crate::formatter::HeadingStyle;
use crate::{error::ChangelogError, types::*, utils::*};
use chrono::NaiveDate;
use version::Version;

#[derive(Debug)]
struct ParserState {
    preamble: String,
    sections: Vec<VersionSection>,
    current: Option<VersionSection>,
    current_category: Option<usize>,
    heading_style: Option<HeadingStyle>,
}

impl ParserState {
    fn new() -> Self {
        Self {
            preamble: String::new(),
            sections: Vec::new(),
            current: None,
            current_category: None,
            heading_style: None,
        }
    }

    fn finish_section(&mut self) {
        if let Some(section) = self.current.take() {
            self.sections.push(section);
        }
        self.current_category = None;
    }
}

/// Line-oriented parser for the changelog grammar in `utils`.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ChangelogConfig,
}

impl Parser {
    pub fn new(config: ChangelogConfig) -> Self {
        Self { config }
    }

    /// # Errors
    /// Returns an error when no version heading exists, a version heading is
    /// repeated, the unreleased heading follows a published one, or a category
    /// is repeated while `ignore_duplicates` is off.
    pub fn parse(&self, content: &str) -> Result<ChangelogDocument> {
        let mut state = ParserState::new();

        for (line_num, raw) in content.split_inclusive('\n').enumerate() {
            self.parse_line(raw, &mut state, line_num + 1)?;
        }
        state.finish_section();

        if state.sections.is_empty() {
            return Err(ChangelogError::ParseError(
                "no version headings found".to_string(),
            ));
        }

        let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

        Ok(ChangelogDocument {
            preamble: state.preamble,
            sections: state.sections,
            heading_style: state.heading_style.unwrap_or_default(),
            newline,
            config: self.config.clone(),
        })
    }

    fn parse_line(&self, raw: &str, state: &mut ParserState, line_num: usize) -> Result<()> {
        let line = strip_line_ending(raw);

        if UNRELEASED_SECTION_PATTERN.is_match(line) {
            return self.handle_unreleased_header(raw, state, line_num);
        }
        if let Some(captures) = VERSION_HEADER_PATTERN.captures(line) {
            return self.handle_version_header(raw, &captures, state, line_num);
        }

        let Some(section) = state.current.as_mut() else {
            state.preamble.push_str(raw);
            return Ok(());
        };
        section.append_raw(raw);

        if let Some(captures) = CHANGELOG_CATEGORY_PATTERN.captures(line) {
            self.handle_category_header(&captures["label"], state)
        } else if let Some(captures) = CHANGELOG_ITEM_PATTERN.captures(line) {
            Self::handle_item_line(line, &captures["text"], state);
            Ok(())
        } else {
            Self::handle_other_line(line, state);
            Ok(())
        }
    }

    fn handle_unreleased_header(
        &self,
        raw: &str,
        state: &mut ParserState,
        line_num: usize,
    ) -> Result<()> {
        if !state.sections.is_empty() || state.current.is_some() {
            return Err(ChangelogError::InvalidFormat(
                line_num,
                "unreleased section must come before every published version".to_string(),
            ));
        }
        self.start_section(raw, VersionId::Unreleased, None, state);
        Ok(())
    }

    fn handle_version_header(
        &self,
        raw: &str,
        captures: &regex::Captures,
        state: &mut ParserState,
        line_num: usize,
    ) -> Result<()> {
        let version = Version::parse(&captures["version"])
            .map_err(|e| ChangelogError::InvalidFormat(line_num, e.user_message()))?;
        let id = VersionId::Published(version);

        let is_duplicate = state
            .sections
            .iter()
            .chain(state.current.as_ref())
            .any(|section| section.id() == &id);
        if is_duplicate {
            return Err(ChangelogError::InvalidFormat(
                line_num,
                format!("duplicate heading for version {id}"),
            ));
        }

        if state.heading_style.is_none() {
            state.heading_style = Some(if captures.name("open").is_some() {
                HeadingStyle::Bracketed
            } else {
                HeadingStyle::Plain
            });
        }

        let date = captures
            .name("date")
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());
        self.start_section(raw, id, date, state);
        Ok(())
    }

    fn start_section(
        &self,
        raw: &str,
        id: VersionId,
        date: Option<NaiveDate>,
        state: &mut ParserState,
    ) {
        state.finish_section();
        let mut section = VersionSection::new(id, date, strip_line_ending(raw));
        section.append_raw(raw);
        state.current = Some(section);
    }

    fn handle_category_header(&self, label: &str, state: &mut ParserState) -> Result<()> {
        let Some(section) = state.current.as_mut() else {
            return Ok(());
        };

        if let Some(index) = section.categories().iter().position(|c| c.label() == label) {
            if !self.config.ignore_duplicates {
                return Err(ChangelogError::DuplicateCategory(
                    label.to_string(),
                    section.id().to_string(),
                ));
            }
            state.current_category = Some(index);
            return Ok(());
        }

        section.categories_mut().push(Category::new(label));
        state.current_category = Some(section.categories().len() - 1);
        Ok(())
    }

    fn handle_item_line(line: &str, text: &str, state: &mut ParserState) {
        let Some(section) = state.current.as_mut() else {
            return;
        };
        match state.current_category {
            Some(index) => section.categories_mut()[index].push(ChangeEntry::new(text)),
            // List items outside of any category are kept as free text
            None => section.push_note(line),
        }
    }

    fn handle_other_line(line: &str, state: &mut ParserState) {
        if line.trim().is_empty() {
            return;
        }
        let Some(section) = state.current.as_mut() else {
            return;
        };

        let Some(index) = state.current_category else {
            section.push_note(line.trim_end());
            return;
        };
        let category = &mut section.categories_mut()[index];
        if is_continuation_line(line) {
            if let Some(entry) = category.last_entry_mut() {
                entry.push_detail(line);
                return;
            }
        }
        category.push_note(line.trim_end());
    }
}
