//! modmap core library — manifest types, manifest loading, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and the [`Manifest`] document
//! - [`error`] — [`ManifestError`]
//! - [`manifest`] — load from a file or a JSON string

pub mod error;
pub mod manifest;
pub mod types;

pub use error::{ManifestError, ManifestErrorKind};
pub use types::{Chunk, Component, ComponentName, ImportMap, Manifest, ScriptEntry, Specifier};
