use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with changelogs
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read or write changelog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse changelog: {0}")]
    ParseError(String),

    #[error("Invalid changelog format at line {0}: {1}")]
    InvalidFormat(usize, String),

    #[error("Duplicate category {0} in version {1}")]
    DuplicateCategory(String, String),

    #[error("Cannot determine latest published version")]
    MissingVersionSection,

    #[error("Invalid version range: {after} must be lower than {upto}")]
    InvalidRange { after: String, upto: String },

    #[error("Version section {0} not found in changelog")]
    MissingSection(String),

    #[error("Entry '{entry}' not found under '{category}' in version {version}")]
    EntryNotFound {
        version: String,
        category: String,
        entry: String,
    },

    #[error(
        "Current version {target_version} is newer than {source_version} from source branch and there might be some inconsistency in between"
    )]
    Regression {
        source_version: String,
        target_version: String,
    },

    #[error("File {} not found at {reference}", .path.display())]
    NotFound { reference: String, path: PathBuf },

    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("Invalid version: {0}")]
    Version(#[from] version::VersionError),

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),
}

impl ChangelogError {
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// Whether the error signals that source and target diverged and a human has to step in.
    #[must_use]
    pub fn needs_manual_resolution(&self) -> bool {
        match self {
            Self::Regression { .. } | Self::MissingSection(_) | Self::EntryNotFound { .. } => true,
            Self::WithContext(_, err) => err.needs_manual_resolution(),
            _ => false,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File operation failed: {e}"),
            Self::ParseError(msg) => format!("Failed to parse changelog: {msg}"),
            Self::InvalidFormat(line, msg) => {
                format!("Invalid changelog format at line {line}: {msg}")
            }
            Self::DuplicateCategory(cat, ver) => {
                format!("Duplicate category {cat} in version {ver}")
            }
            Self::MissingVersionSection => "Cannot determine latest published version".to_string(),
            Self::InvalidRange { after, upto } => {
                format!("Invalid version range ({after}, {upto}]")
            }
            Self::MissingSection(ver) => format!("Version section {ver} not found"),
            Self::EntryNotFound {
                version,
                category,
                entry,
            } => format!("Entry '{entry}' not found under '{category}' in version {version}"),
            Self::Regression {
                source_version,
                target_version,
            } => format!(
                "Current version {target_version} is newer than source branch version {source_version}. Please update manually."
            ),
            Self::NotFound { reference, path } => {
                format!("{} does not exist at {reference}", path.display())
            }
            Self::Git(msg) => format!("Git operation failed: {msg}"),
            Self::Version(err) => err.user_message(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}
