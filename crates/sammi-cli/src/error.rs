//! Error handling for the SAMMI Next CLI.
//!
//! `CliError` is what every command returns. Config and packaging failures
//! come from their own crates and convert automatically via `#[from]`.

mod miette;

use std::path::PathBuf;

use sammi_config::ConfigError;
use sammi_package::PackageError;
use thiserror::Error;

use crate::build::BundlerError;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config discovery, validation or resolution failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The one-shot build failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The file watcher could not be stopped cleanly
    #[error("failed to stop watching files: {0}")]
    WatchShutdown(#[source] notify::Error),

    /// The file watcher could not be started
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

/// Failures of a single build pass.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Bundler(#[from] BundlerError),

    #[error(transparent)]
    Packaging(#[from] PackageError),

    #[error("output directory is not writable: {}\n\nHint: check directory permissions or pass a different --outDir", .path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
