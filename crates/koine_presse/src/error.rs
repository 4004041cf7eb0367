//! Error types for koine_presse.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while compiling or serving a translation bundle.
///
/// Configuration errors point at a broken deployment and are never retried.
/// IO errors are propagated as-is: serving a stale or absent bundle silently
/// would be worse than failing at startup. A missing translation at lookup
/// time is not an error at all; the resolver falls back to the literal
/// message instead.
#[derive(Debug, Error)]
pub enum PresseError {
    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configured catalog base directory does not exist
    #[error("catalog base directory not found: {path}")]
    BaseDirMissing {
        /// The configured directory
        path: PathBuf,
    },

    /// The active language is empty or undeclared
    #[error("no active language declared; a resolver requires a language code")]
    LanguageMissing,

    /// Error reading a catalog file
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        /// The catalog file
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// A catalog file exists but does not hold a flat message -> text mapping
    #[error("malformed catalog {path}: {detail}")]
    Catalog {
        /// The catalog file
        path: PathBuf,
        /// What was wrong with it
        detail: String,
    },

    /// Error writing the bundle artifact
    #[error("failed to write artifact {path}: {source}")]
    ArtifactWrite {
        /// The artifact destination
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// Error persisting the fingerprint
    #[error("failed to write fingerprint {path}: {source}")]
    FingerprintWrite {
        /// The fingerprint destination
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// Error serializing the translation mapping
    #[error("failed to serialize mapping: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Other IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
