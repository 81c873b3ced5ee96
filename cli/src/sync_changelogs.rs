use crate::config::SyncConfig;
use crate::error::{CliError, Result, ResultExt};
use crate::packages::WorkspacePackages;
use crate::ui;
use crate::vcs::GitVersionControl;
use changelog::{ChangelogError, SyncOptions, SyncOrchestrator, SyncStatus, SyncSummary};
use git::{RealGitRepository, Repository};
use std::path::PathBuf;
use tracing::debug;

/// Arguments of the sync-branch-changelogs command
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub branch: String,
    pub remote: Option<String>,
    pub fetch: bool,
    pub packages: Vec<String>,
    pub verbose: bool,
}

pub fn execute(args: SyncArgs) -> Result<()> {
    let start = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };

    let repo = RealGitRepository::open_at(&start)
        .map_err(|e| CliError::Git(e).with_context("Failed to open git repository"))?;
    let root = repo
        .workdir()
        .with_context(|| "Cannot sync changelogs in a bare repository")?;
    let config = SyncConfig::load(&root, args.config.as_deref())?;
    let remote = args.remote.clone().unwrap_or_else(|| config.remote.clone());

    if args.verbose {
        if let Ok(current) = repo.get_current_branch() {
            ui::info_message(&format!("Syncing {remote}/{} into '{current}'", args.branch));
        }
    }

    ui::status_message("Discovering packages");
    let packages = WorkspacePackages::discover(&root, &config)?;
    debug!(root = %root.display(), count = packages.len(), "discovered packages");
    if packages.is_empty() {
        ui::warning_message("No packages found in the workspace");
        return Ok(());
    }

    if args.fetch {
        ui::status_message(&format!("Fetching {remote}/{}", args.branch));
    }

    let options = SyncOptions {
        remote,
        branch: args.branch.clone(),
        fetch: args.fetch,
        packages: args.packages.clone(),
    };
    let vcs = GitVersionControl::new(repo);
    let summary = SyncOrchestrator::new(&vcs, &packages, config.changelog_config()).run(&options)?;

    report(&summary, args.verbose);
    Ok(())
}

fn report(summary: &SyncSummary, verbose: bool) {
    ui::section_header("Changelogs");
    for package in &summary.reports {
        match &package.outcome {
            Ok(SyncStatus::Updated(stats)) => ui::package_updated(&package.package, stats, verbose),
            Ok(SyncStatus::Unchanged) if verbose => ui::package_unchanged(&package.package),
            Ok(SyncStatus::Unchanged) => {}
            Err(err) => ui::package_failed(&package.package, &failure_message(&package.package, err)),
        }
    }

    ui::section_header("Summary");
    ui::summary_line("Updated", summary.updated());
    ui::summary_line("Unchanged", summary.unchanged());
    ui::summary_line("Failed", summary.failed());
    if summary.failed() > 0 {
        ui::warning_message("Some changelogs need to be updated manually");
    }
}

/// The error without the package name the orchestrator prefixes it with
fn failure_message(package: &str, err: &ChangelogError) -> String {
    match err {
        ChangelogError::WithContext(context, inner) if context == package => inner.user_message(),
        _ => err.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_strips_package_context() {
        let err = ChangelogError::MissingVersionSection.with_context("expo-image");
        assert_eq!(
            failure_message("expo-image", &err),
            "Cannot determine latest published version"
        );
        assert_eq!(
            failure_message("expo-camera", &err),
            "expo-image: Cannot determine latest published version"
        );
    }
}
