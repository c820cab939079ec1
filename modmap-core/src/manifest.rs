//! Manifest loading.
//!
//! The bundler writes the manifest as JSON. Loading is the only fallible
//! step in the whole pipeline: once a [`Manifest`] exists, rendering never
//! fails on missing data.

use std::path::Path;

use crate::error::ManifestError;
use crate::types::Manifest;

/// Origin label used in errors for manifests parsed from a string.
pub const INLINE_ORIGIN: &str = "<inline>";

/// Parse a manifest from a JSON string.
pub fn from_json_str(json: &str) -> Result<Manifest, ManifestError> {
    serde_json::from_str(json).map_err(|source| ManifestError::Malformed {
        origin: INLINE_ORIGIN.to_string(),
        source,
    })
}

/// Load a manifest from a JSON file.
///
/// Returns `ManifestError::Unreadable` if the file cannot be read and
/// `ManifestError::Malformed` (with the path) if its bytes do not parse,
/// including when they are not valid UTF-8.
pub fn load_at(path: &Path) -> Result<Manifest, ManifestError> {
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    // Invalid UTF-8 surfaces as a parse error, not an I/O one.
    serde_json::from_slice(&bytes).map_err(|source| ManifestError::Malformed {
        origin: path.display().to_string(),
        source,
    })
}
