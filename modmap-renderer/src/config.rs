//! Render configuration — names the emitted HTML depends on.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! manifest_global: __APP_MANIFEST__
//! ready_event: app:manifest-ready
//! cache_key_attribute: data-sw-cache
//! cache_url_attribute: data-sw-src
//! template_dir: ./tag-templates
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, RenderError};

pub const DEFAULT_MANIFEST_GLOBAL: &str = "__MODMAP_MANIFEST__";
pub const DEFAULT_READY_EVENT: &str = "modmap:manifest-ready";
pub const DEFAULT_CACHE_KEY_ATTRIBUTE: &str = "data-cache-key";
pub const DEFAULT_CACHE_URL_ATTRIBUTE: &str = "data-cache-url";
pub const DEFAULT_MANIFEST_ENTRY: &str = "manifest";
pub const DEFAULT_CLIENT_ENTRY: &str = "client";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// `window` property the legacy manifest script assigns.
    pub manifest_global: String,
    /// Event dispatched on `document` once the legacy manifest is set.
    pub ready_event: String,
    /// Attribute carrying the `name:hash` cache token.
    pub cache_key_attribute: String,
    /// Attribute carrying the real URL of inlined content.
    pub cache_url_attribute: String,
    /// Cache entry name of the manifest script.
    pub manifest_entry: String,
    /// Cache entry name of the client loader.
    pub client_entry: String,
    /// Directory of `.tera` files overriding the embedded tag templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            manifest_global: DEFAULT_MANIFEST_GLOBAL.to_string(),
            ready_event: DEFAULT_READY_EVENT.to_string(),
            cache_key_attribute: DEFAULT_CACHE_KEY_ATTRIBUTE.to_string(),
            cache_url_attribute: DEFAULT_CACHE_URL_ATTRIBUTE.to_string(),
            manifest_entry: DEFAULT_MANIFEST_ENTRY.to_string(),
            client_entry: DEFAULT_CLIENT_ENTRY.to_string(),
            template_dir: None,
        }
    }
}

impl RendererConfig {
    /// Load a config from a YAML file.
    ///
    /// A relative `template_dir` is resolved against the config file's directory.
    pub fn load_at(path: &Path) -> Result<Self, RenderError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let mut config: RendererConfig = if contents.trim().is_empty() {
            RendererConfig::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|source| RenderError::Config {
                path: path.to_path_buf(),
                source,
            })?
        };
        for (field, value) in [
            ("cache_key_attribute", &config.cache_key_attribute),
            ("cache_url_attribute", &config.cache_url_attribute),
        ] {
            if !is_attribute_name(value) {
                return Err(RenderError::InvalidConfig {
                    path: path.to_path_buf(),
                    field,
                    value: value.clone(),
                    reason: "must be ASCII letters, digits or '-', starting with a letter",
                });
            }
        }
        if let (Some(dir), Some(base)) = (config.template_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.template_dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }
}

/// Marker attribute names are emitted unescaped: ASCII letters, digits and `-`, letter first.
fn is_attribute_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
