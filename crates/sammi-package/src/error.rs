use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackageError>;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("bundled script not found: {}\n\nHint: the bundler must write its output before packaging", .0.display())]
    BundleMissing(PathBuf),

    #[error("over file {} is not valid JSON: {message}", .path.display())]
    InvalidOver { path: PathBuf, message: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
