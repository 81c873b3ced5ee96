use crate::config::ChangelogConfig;
use crate::core::Changelog;
use crate::diff::compute_changes;
use crate::document::ChangelogDocument;
use crate::error::ChangelogError;
use crate::ports::{Package, PackageRepository, VersionControl};
use crate::reorganizer::MoveOptions;
use crate::types::{Result, VersionId};
use std::cmp::Ordering;
use tracing::{debug, info, warn};
use version::Version;

/// Where to read source changelogs from, and which packages to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub remote: String,
    pub branch: String,
    /// Fetch `remote/branch` before reading from it
    pub fetch: bool,
    /// Package names to process; empty means every package
    pub packages: Vec<String>,
}

impl SyncOptions {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
            fetch: false,
            packages: Vec::new(),
        }
    }

    /// Remote-tracking reference the source changelogs are read at
    #[must_use]
    pub fn source_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    fn includes(&self, package: &Package) -> bool {
        self.packages.is_empty() || self.packages.iter().any(|name| name == &package.name)
    }
}

/// How each migrated entry reached the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    /// Moved out of the target's unreleased section
    pub moved: usize,
    /// Added without a counterpart in the unreleased section
    pub inserted: usize,
}

impl MigrationStats {
    #[must_use]
    pub const fn applied(&self) -> usize {
        self.moved + self.inserted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Updated(MigrationStats),
    Unchanged,
}

/// Outcome of one package
#[derive(Debug)]
pub struct PackageReport {
    pub package: String,
    pub outcome: Result<SyncStatus>,
}

impl PackageReport {
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self.outcome, Ok(SyncStatus::Updated(_)))
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Per-package outcomes of a run, in processing order
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub reports: Vec<PackageReport>,
}

impl SyncSummary {
    #[must_use]
    pub fn updated(&self) -> usize {
        self.reports.iter().filter(|r| r.is_updated()).count()
    }

    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Ok(SyncStatus::Unchanged)))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ChangelogError)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.package.as_str(), e)))
    }
}

/// Brings each package's local changelog up to date with the published
/// versions of the same changelog on another branch.
pub struct SyncOrchestrator<'a> {
    vcs: &'a dyn VersionControl,
    packages: &'a dyn PackageRepository,
    config: ChangelogConfig,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        packages: &'a dyn PackageRepository,
        config: ChangelogConfig,
    ) -> Self {
        Self {
            vcs,
            packages,
            config,
        }
    }

    /// Processes every package with a changelog, sorted by name.
    ///
    /// # Errors
    /// Returns an error only when the run cannot start: the package list cannot
    /// be built or the requested fetch fails. Package failures are reported in
    /// the summary.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncSummary> {
        if options.fetch {
            info!(remote = %options.remote, branch = %options.branch, "fetching source branch");
            self.vcs.fetch(&options.remote, &options.branch)?;
        }

        let mut packages: Vec<Package> = self
            .packages
            .list_packages()?
            .into_iter()
            .filter(|package| options.includes(package) && package.has_changelog())
            .collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        let mut summary = SyncSummary::default();
        for package in &packages {
            let outcome = self
                .sync_package(package, options)
                .map_err(|e| e.with_context(&package.name));

            match &outcome {
                Ok(SyncStatus::Updated(stats)) => info!(
                    package = %package.name,
                    moved = stats.moved,
                    inserted = stats.inserted,
                    "changelog updated"
                ),
                Ok(SyncStatus::Unchanged) => info!(package = %package.name, "changelog up to date"),
                Err(e) => warn!(package = %package.name, error = %e, "changelog sync failed"),
            }

            summary.reports.push(PackageReport {
                package: package.name.clone(),
                outcome,
            });
        }

        Ok(summary)
    }

    /// Migrates the entries published on the source branch after the target's
    /// last published version into the local changelog, saving after every entry.
    ///
    /// Only the target's last published version is compared, so a target that
    /// already carries the source's last version is left alone even when some
    /// of its entries are missing.
    ///
    /// # Errors
    /// `NotFound` when the source changelog is missing on the branch,
    /// `MissingVersionSection` when either side has no published version,
    /// `Regression` when the local changelog is ahead of the source.
    pub fn sync_package(&self, package: &Package, options: &SyncOptions) -> Result<SyncStatus> {
        let source_text = self
            .vcs
            .read_file(&options.source_ref(), &package.changelog_path)?;
        let source = ChangelogDocument::parse_with_config(&source_text, &self.config)
            .map_err(|e| e.with_context(format!("source changelog at {}", options.source_ref())))?;
        let mut target = Changelog::open(&package.local_changelog_path, &self.config)?;

        let source_last = source
            .last_published_version()
            .cloned()
            .ok_or(ChangelogError::MissingVersionSection)?;
        let target_last = target
            .document()
            .last_published_version()
            .cloned()
            .ok_or(ChangelogError::MissingVersionSection)?;

        match Version::compare(&target_last, &source_last) {
            Ordering::Greater => {
                return Err(ChangelogError::Regression {
                    source_version: source_last.to_string(),
                    target_version: target_last.to_string(),
                });
            }
            Ordering::Equal => {
                debug!(package = %package.name, version = %target_last, "versions match");
                return Ok(SyncStatus::Unchanged);
            }
            Ordering::Less => {}
        }

        let mut changes = compute_changes(&source, &target_last, &source_last)?;
        changes.remove(&VersionId::Unreleased);
        debug!(
            package = %package.name,
            after = %target_last,
            upto = %source_last,
            entries = changes.total_count(),
            "computed changes"
        );
        if changes.is_empty() {
            return Ok(SyncStatus::Unchanged);
        }

        let mut stats = MigrationStats::default();
        for (version, category, entry) in changes.iter_entries() {
            let to = &version.version;
            let move_options = MoveOptions {
                release_date: version.date,
            };
            let document = target.document_mut();

            // The unreleased copy may sit under another category than the one
            // it was published under; it moves either way.
            let filed_under = document
                .unreleased()
                .and_then(|section| section.category_of(entry.text()))
                .map(str::to_string);
            match filed_under {
                Some(from_category) => {
                    document.refile_entry(
                        &VersionId::Unreleased,
                        &from_category,
                        to,
                        category,
                        entry,
                        move_options,
                    )?;
                    stats.moved += 1;
                }
                None => {
                    debug!(version = %to, category, entry = entry.text(), "inserting changelog entry");
                    document.insert_entry(to, category, entry, move_options)?;
                    stats.inserted += 1;
                }
            }

            target.save()?;
        }

        Ok(SyncStatus::Updated(stats))
    }
}
