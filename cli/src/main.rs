mod cli;
mod config;
mod error;
mod packages;
mod sync_changelogs;
mod ui;
mod vcs;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use sync_changelogs::SyncArgs;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) if verbose => "warn,changelog=debug,git=debug,changelog_sync=debug".to_string(),
        Err(_) => "warn".to_string(),
    };
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::SyncBranchChangelogs {
            branch,
            remote,
            fetch,
            packages,
        } => sync_changelogs::execute(SyncArgs {
            root: cli.root,
            config: cli.config,
            branch,
            remote,
            fetch,
            packages,
            verbose: cli.verbose,
        }),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
