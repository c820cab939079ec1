//! Domain types for the build-time module manifest.
//!
//! The manifest is produced by the bundler and never mutated after load.
//! Every map is an [`IndexMap`] so document order survives a round trip;
//! the import map in particular must be re-emitted in the order it was
//! written.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of an ES module component as it appears in `components`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentName(pub String);

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ComponentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for ComponentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A bare module specifier, e.g. `lit` or `chunk:debounce`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specifier(pub String);

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Specifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Specifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for Specifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Manifest entries
// ---------------------------------------------------------------------------

/// Browser import map (`{"imports": {...}, "scopes": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportMap {
    #[serde(default)]
    pub imports: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scopes: IndexMap<String, IndexMap<String, String>>,
}

/// A head script the bundler emits both as a file and as inline source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub url: String,
    pub hash: String,
    pub content: String,
}

/// An ES module component and the chunk specifiers it imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Source path relative to the project, handed to the cache oracle.
    pub src: String,
    pub url: String,
    #[serde(default, alias = "deps")]
    pub dependencies: Vec<Specifier>,
}

/// A shared code chunk that is not part of the static import map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub url: String,
    /// `data:` URL carrying the chunk source.
    pub data_url: String,
    pub hash: String,
}

/// Root of the build manifest.
///
/// A missing `manifestScript` marks the legacy manifest shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub import_map: ImportMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_script: Option<ScriptEntry>,
    pub client: ScriptEntry,
    #[serde(default)]
    pub components: IndexMap<ComponentName, Component>,
    #[serde(default)]
    pub chunks: IndexMap<Specifier, Chunk>,
}

impl Manifest {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn chunk(&self, specifier: &str) -> Option<&Chunk> {
        self.chunks.get(specifier)
    }

    /// URL of a component's own module.
    pub fn component_url(&self, name: &str) -> Option<&str> {
        self.component(name).map(|c| c.url.as_str())
    }

    /// Resolve a specifier through the static import map, then the chunk table.
    pub fn module_url(&self, specifier: &str) -> Option<&str> {
        self.import_map
            .imports
            .get(specifier)
            .map(String::as_str)
            .or_else(|| self.chunk(specifier).map(|c| c.url.as_str()))
    }

    /// `true` for the current manifest shape, `false` for the legacy one.
    pub fn has_manifest_script(&self) -> bool {
        self.manifest_script.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> ScriptEntry {
        ScriptEntry {
            url: url.to_string(),
            hash: "h".to_string(),
            content: String::new(),
        }
    }

    fn sample() -> Manifest {
        let mut import_map = ImportMap::default();
        import_map
            .imports
            .insert("lit".to_string(), "/vendor/lit.js".to_string());

        let mut components = IndexMap::new();
        components.insert(
            ComponentName::from("search"),
            Component {
                src: "components/search.js".to_string(),
                url: "/assets/search.js".to_string(),
                dependencies: vec![Specifier::from("chunk:debounce"), Specifier::from("lit")],
            },
        );

        let mut chunks = IndexMap::new();
        chunks.insert(
            Specifier::from("chunk:debounce"),
            Chunk {
                url: "/chunk.js".to_string(),
                data_url: "data:text/javascript,export{}".to_string(),
                hash: "abc123".to_string(),
            },
        );

        Manifest {
            import_map,
            manifest_script: None,
            client: entry("/client.js"),
            components,
            chunks,
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(ComponentName::from("search").to_string(), "search");
        assert_eq!(Specifier::from("chunk:a").to_string(), "chunk:a");
    }

    #[test]
    fn lookups_by_str() {
        let m = sample();
        assert_eq!(m.component_url("search"), Some("/assets/search.js"));
        assert!(m.component("missing").is_none());
        assert_eq!(m.chunk("chunk:debounce").map(|c| c.hash.as_str()), Some("abc123"));
    }

    #[test]
    fn module_url_prefers_import_map_then_chunks() {
        let m = sample();
        assert_eq!(m.module_url("lit"), Some("/vendor/lit.js"));
        assert_eq!(m.module_url("chunk:debounce"), Some("/chunk.js"));
        assert_eq!(m.module_url("nope"), None);
    }

    #[test]
    fn legacy_shape_detected() {
        let mut m = sample();
        assert!(!m.has_manifest_script());
        m.manifest_script = Some(entry("/manifest.js"));
        assert!(m.has_manifest_script());
    }
}
