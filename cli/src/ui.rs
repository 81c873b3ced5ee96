use changelog::MigrationStats;
use colored::Colorize;
use std::io::{self, Write};

/// Print a status message for a step that is about to run
pub fn status_message(message: &str) {
    println!("{} {} ... ", "⏳".yellow(), message.bright_white());
    let _ = io::stdout().flush();
}

pub fn warning_message(message: &str) {
    println!("{} {}", "⚠️ ".yellow(), message.yellow());
}

pub fn info_message(message: &str) {
    println!("{} {}", "ℹ️ ".blue(), message.blue());
}

pub fn section_header(title: &str) {
    println!("\n{}", format!("==== {} ====", title).cyan().bold());
}

/// A package whose changelog received entries from the branch
pub fn package_updated(name: &str, stats: &MigrationStats, verbose: bool) {
    println!("{} {}", "✅".green(), name.green());
    if verbose {
        println!(
            "    {} entries: {} moved, {} inserted",
            stats.applied().to_string().cyan(),
            stats.moved.to_string().cyan(),
            stats.inserted.to_string().cyan()
        );
    }
}

pub fn package_unchanged(name: &str) {
    println!("   {} {}", name.dimmed(), "is up to date".dimmed());
}

/// Failures go to stderr so they survive `> /dev/null`
pub fn package_failed(name: &str, reason: &str) {
    eprintln!("{} {}: {}", "❌".red(), name.red().bold(), reason.red());
}

/// Print a `label: value` line of a summary block
pub fn summary_line(label: &str, value: usize) {
    println!("  {} {}", format!("{label}:").bright_white(), value.to_string().cyan());
}
