//! Error types for configuration loading, validation and resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// One violated schema rule, reported against a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    // Discovery errors
    #[error(
        "SAMMI Next config file not found in {}\n\nHint: create one of {}",
        .root.display(),
        .candidates.join(", ")
    )]
    NotFound {
        root: PathBuf,
        candidates: Vec<&'static str>,
    },

    #[error("the custom config file path was not found: {}", .0.display())]
    ExplicitNotFound(PathBuf),

    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to load {}:\n{message}", .path.display())]
    Parse { path: PathBuf, message: String },

    // Schema errors, always aggregated
    #[error("invalid config from {origin}:\n{}", format_violations(.violations))]
    Invalid {
        origin: String,
        violations: Vec<FieldViolation>,
    },

    // Resolution errors
    #[error("{field} file not found: {}", .path.display())]
    PathNotFound { field: &'static str, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Field violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ConfigError::Invalid { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("    - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
