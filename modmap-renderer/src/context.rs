//! Tag contexts — serializable payloads handed to the tag templates.
//!
//! Every field is serialized even when empty (`null`), so templates can
//! test any field with `{% if %}` without tripping on undefined values.

use serde::Serialize;

use crate::config::RendererConfig;
use crate::error::RenderError;

/// Cache marker attributes for the client-side caching layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheMarkers {
    pub key_attribute: String,
    pub url_attribute: String,
    /// `name:hash`
    pub key: String,
    pub url: String,
}

impl CacheMarkers {
    pub fn new(config: &RendererConfig, name: &str, hash: &str, url: &str) -> Self {
        CacheMarkers {
            key_attribute: config.cache_key_attribute.clone(),
            url_attribute: config.cache_url_attribute.clone(),
            key: format!("{name}:{hash}"),
            url: url.to_string(),
        }
    }
}

/// `<script type="importmap">` payload. `json` is already serialized.
#[derive(Debug, Clone, Serialize)]
pub struct ImportMapTag {
    pub json: String,
    pub markers: Option<CacheMarkers>,
}

/// `<script>` payload: inline (`body`), external (`src`), or tracked inline.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptTag {
    pub module: bool,
    pub src: Option<String>,
    pub body: Option<String>,
    pub markers: Option<CacheMarkers>,
}

/// `<link rel="modulepreload">` payload.
#[derive(Debug, Clone, Serialize)]
pub struct PreloadTag {
    pub href: String,
}

/// Legacy manifest script payload; every field is a JSON literal.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyManifestTag {
    pub global_json: String,
    pub components_json: String,
    pub event_json: String,
}

/// Convert any tag payload to a [`tera::Context`] for rendering.
pub fn to_tera_context<T: Serialize>(tag: &T) -> Result<tera::Context, RenderError> {
    tera::Context::from_serialize(tag).map_err(RenderError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_combine_name_and_hash() {
        let config = RendererConfig::default();
        let m = CacheMarkers::new(&config, "chunk:a", "abc", "/a.js");
        assert_eq!(m.key, "chunk:a:abc");
        assert_eq!(m.key_attribute, "data-cache-key");
        assert_eq!(m.url_attribute, "data-cache-url");
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let tag = ScriptTag {
            module: false,
            src: None,
            body: None,
            markers: None,
        };
        let value = serde_json::to_value(&tag).unwrap();
        assert!(value["src"].is_null());
        assert!(value["markers"].is_null());
        to_tera_context(&tag).expect("context conversion");
    }
}
