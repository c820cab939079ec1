//! Error types for modmap-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while obtaining a [`Manifest`](crate::Manifest).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read (missing, permission denied, etc.).
    #[error("manifest unreadable at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest was read but is not a valid manifest document.
    /// `origin` is the file path, or `<inline>` for string input.
    #[error("manifest malformed ({origin}): {source}")]
    Malformed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a [`ManifestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestErrorKind {
    Unreadable,
    Malformed,
}

impl fmt::Display for ManifestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestErrorKind::Unreadable => write!(f, "unreadable"),
            ManifestErrorKind::Malformed => write!(f, "malformed"),
        }
    }
}

impl ManifestError {
    pub fn kind(&self) -> ManifestErrorKind {
        match self {
            ManifestError::Unreadable { .. } => ManifestErrorKind::Unreadable,
            ManifestError::Malformed { .. } => ManifestErrorKind::Malformed,
        }
    }
}
