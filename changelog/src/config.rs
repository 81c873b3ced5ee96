use crate::types::ChangeType;

/// Configuration options for changelog parsing and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogConfig {
    /// chrono format used for release dates of created sections
    pub date_format: String,
    /// Canonical category order; categories are created at their rank
    pub category_order: Vec<ChangeType>,
    /// Merge repeated category headings instead of failing
    pub ignore_duplicates: bool,
    /// Keep empty category headings of the unreleased section when it is re-rendered
    pub preserve_unreleased_template: bool,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            category_order: ChangeType::ALL.to_vec(),
            ignore_duplicates: false,
            preserve_unreleased_template: false,
        }
    }
}
