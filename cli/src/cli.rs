use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "changelog-sync")]
#[command(
    author,
    version,
    about = "Keeps package changelogs in sync with the versions published from another branch"
)]
pub struct Cli {
    /// Repository directory to operate on (defaults to the current directory)
    #[clap(long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file path (defaults to changelog-sync.toml at the repository root)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output with additional information
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync package changelogs from a release branch into the current branch
    #[clap(name = "sync-branch-changelogs", visible_alias = "ssbc")]
    SyncBranchChangelogs {
        /// Source branch name
        #[clap(short, long)]
        branch: String,

        /// Remote the source branch is read from (defaults to the config value or origin)
        #[clap(long)]
        remote: Option<String>,

        /// Fetch the source branch before reading from it
        #[clap(long, default_value_t = false)]
        fetch: bool,

        /// Only sync the named package (repeatable)
        #[clap(short, long = "package")]
        packages: Vec<String>,
    },
}
