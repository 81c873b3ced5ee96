//! Changelog documents and the branch synchronization built on them.
//!
//! A changelog is parsed into a [`ChangelogDocument`] that keeps untouched
//! sections byte-for-byte. [`compute_changes`] collects entries published on
//! one side, [`ChangelogDocument::move_entry`] migrates them, and
//! [`SyncOrchestrator`] drives both across the packages of a workspace.

pub mod config;
pub mod core;
pub mod diff;
pub mod document;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod ports;
pub mod position;
pub mod reorganizer;
pub mod sync;
pub mod types;
pub mod utils;

pub use config::ChangelogConfig;
pub use crate::core::Changelog;
pub use diff::{CategoryChanges, ChangeSet, VersionChanges, compute_changes};
pub use document::{ChangelogDocument, VersionSection};
pub use error::ChangelogError;
pub use formatter::HeadingStyle;
pub use ports::{Package, PackageRepository, VersionControl};
pub use reorganizer::MoveOptions;
pub use sync::{
    MigrationStats, PackageReport, SyncOptions, SyncOrchestrator, SyncStatus, SyncSummary,
};
pub use types::{Category, ChangeEntry, ChangeType, Result, UNRELEASED_VERSION_NAME, VersionId};
