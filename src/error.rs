//! Error types for the library.

use std::path::PathBuf;

use crate::verify::Drift;

/// Library error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::Config`].
    #[error("invalid config {}: {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No config directory could be determined for this platform.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// JSON encoding failed.
    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedded identity does not match the working tree.
    #[error("build identity does not match working tree: {}", describe_drift(.0))]
    Drift(Vec<Drift>),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_drift(drift: &[Drift]) -> String {
    drift
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;
