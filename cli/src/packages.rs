use crate::config::SyncConfig;
use crate::error::Result;
use anyhow::{Context, anyhow};
use changelog::{Package, PackageRepository};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Packages of a JavaScript monorepo, discovered once per run
#[derive(Debug, Clone)]
pub struct WorkspacePackages {
    packages: Vec<Package>,
}

impl WorkspacePackages {
    /// Finds every package matched by the configured globs, or by the
    /// `workspaces` field of the root package.json.
    pub fn discover(root: &Path, config: &SyncConfig) -> Result<Self> {
        let workspaces = if config.packages.is_empty() {
            get_workspaces(root).context("Failed to read workspaces from root package.json")?
        } else {
            config.packages.clone()
        };
        debug!(?workspaces, "package globs");

        let mut packages = find_all_packages(root, &workspaces, &config.changelog_file)
            .context("Failed to scan packages")?;
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        packages.dedup_by(|a, b| a.local_changelog_path == b.local_changelog_path);

        Ok(Self { packages })
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageRepository for WorkspacePackages {
    fn list_packages(&self) -> changelog::Result<Vec<Package>> {
        Ok(self.packages.clone())
    }
}

fn get_workspaces(dir: &Path) -> anyhow::Result<Vec<String>> {
    let package_json_path = dir.join("package.json");
    if !package_json_path.exists() {
        return Err(anyhow!("No package.json found in {}", dir.display()));
    }

    let content = fs::read_to_string(&package_json_path)?;
    let root_pkg: Value = serde_json::from_str(&content)?;

    let workspaces = match &root_pkg["workspaces"] {
        Value::Array(arr) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        Value::Object(obj) => match obj.get("packages").and_then(|p| p.as_array()) {
            Some(pkgs) => pkgs
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            None => return Err(anyhow!("Unable to parse workspaces in package.json")),
        },
        _ => return Err(anyhow!("No workspaces found in package.json")),
    };

    Ok(workspaces)
}

fn find_all_packages(
    root: &Path,
    workspaces: &[String],
    changelog_file: &str,
) -> anyhow::Result<Vec<Package>> {
    let root_str = root.to_string_lossy();
    let escaped_root = glob::Pattern::escape(root_str.trim_end_matches(['/', '\\']));
    let mut packages = Vec::new();

    for workspace in workspaces {
        let pattern = format!("{}/{}/package.json", escaped_root, workspace.trim_end_matches('/'));
        for entry in glob::glob(&pattern).with_context(|| format!("Invalid workspace glob '{workspace}'"))? {
            match entry {
                Ok(path) => {
                    if let Some(package) = read_package(root, &path, changelog_file)? {
                        packages.push(package);
                    }
                }
                Err(e) => debug!("Error processing entry: {}", e),
            }
        }
    }

    Ok(packages)
}

fn read_package(root: &Path, manifest: &Path, changelog_file: &str) -> anyhow::Result<Option<Package>> {
    let content = fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;
    let pkg_data: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", manifest.display()))?;

    let Some(name) = pkg_data.get("name").and_then(Value::as_str) else {
        debug!("Skipping package at {} - no name field", manifest.display());
        return Ok(None);
    };

    let dir = manifest
        .parent()
        .ok_or_else(|| anyhow!("Invalid package path {}", manifest.display()))?;
    let relative_dir: PathBuf = dir
        .strip_prefix(root)
        .with_context(|| format!("{} is outside of {}", dir.display(), root.display()))?
        .to_path_buf();

    Ok(Some(Package::new(
        name,
        relative_dir.join(changelog_file),
        dir.join(changelog_file),
    )))
}
