use crate::error::{CliError, Result};
use changelog::ChangelogConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "changelog-sync.toml";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Settings read from `changelog-sync.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Remote the source branch is read from
    pub remote: String,
    /// Changelog file name inside each package
    pub changelog_file: String,
    /// Package directory globs; overrides the `workspaces` of the root package.json
    pub packages: Vec<String>,
    pub ignore_duplicates: bool,
    pub preserve_unreleased_template: bool,
    /// chrono format for release dates of created sections
    pub date_format: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            changelog_file: DEFAULT_CHANGELOG_FILE.to_string(),
            packages: Vec::new(),
            ignore_duplicates: false,
            preserve_unreleased_template: false,
            date_format: None,
        }
    }
}

impl SyncConfig {
    /// Loads the explicit config file, or the optional one at the repository root.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(CliError::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };

        Self::load_from_file(&path)
            .map_err(|e| e.with_context(format!("Failed to load {}", path.display())))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SyncConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for pattern in &self.packages {
            glob::Pattern::new(pattern)?;
        }
        if self.changelog_file.trim().is_empty() {
            return Err(CliError::Other("changelog_file must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn changelog_config(&self) -> ChangelogConfig {
        let defaults = ChangelogConfig::default();
        ChangelogConfig {
            date_format: self.date_format.clone().unwrap_or(defaults.date_format),
            ignore_duplicates: self.ignore_duplicates,
            preserve_unreleased_template: self.preserve_unreleased_template,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SyncConfig::load(dir.path(), None).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.remote, "origin");
        assert_eq!(config.changelog_config(), ChangelogConfig::default());
    }

    #[test]
    fn test_load_from_repository_root() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
remote = "upstream"
packages = ["packages/*", "packages/@expo/*"]
preserve_unreleased_template = true
date_format = "%d.%m.%Y"
"#,
        )
        .unwrap();

        let config = SyncConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.changelog_file, "CHANGELOG.md");
        assert_eq!(config.packages.len(), 2);

        let changelog_config = config.changelog_config();
        assert_eq!(changelog_config.date_format, "%d.%m.%Y");
        assert!(changelog_config.preserve_unreleased_template);
        assert!(!changelog_config.ignore_duplicates);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("custom.toml");
        assert!(matches!(
            SyncConfig::load(dir.path(), Some(&missing)),
            Err(CliError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");

        fs::write(&path, "remotes = \"origin\"\n").unwrap();
        let err = SyncConfig::load(dir.path(), Some(&path)).unwrap_err();
        assert!(err.user_message().contains("custom.toml"));

        fs::write(&path, "packages = [\"packages/[\"]\n").unwrap();
        let err = SyncConfig::load(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::WithContext(_, ref inner) if matches!(**inner, CliError::GlobError(_))));
    }
}
