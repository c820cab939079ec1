//! Error types for modmap-renderer.

use std::path::PathBuf;

use thiserror::Error;

use modmap_core::ManifestError;

/// All errors that can arise from renderer construction or tag rendering.
///
/// Rendering anomalies (unknown component, repeated head script) are not
/// errors; they surface as [`RenderWarning`](crate::RenderWarning)s.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The manifest could not be read or parsed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (script bodies, tag context).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading config or user templates.
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// Render config YAML did not parse.
    #[error("failed to parse render config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Render config parsed but holds an unusable value.
    #[error("invalid render config at {path}: {field} {value:?} {reason}")]
    InvalidConfig {
        path: PathBuf,
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}
