//! Cache oracle — the external caching layer, as seen by the renderer.
//!
//! Both capabilities are optional. A method returning `None` means the
//! integration does not provide it, and the renderer falls back to its own
//! plain rendering.

use std::collections::{HashMap, HashSet};

/// Answers questions about what the client already holds.
///
/// Implementations are consulted synchronously during rendering and must
/// be side-effect free (typically a cookie or header lookup).
pub trait CacheOracle {
    /// Whether the client has entry `name` at content hash `hash` cached.
    fn has_cached_entry(&self, _name: &str, _hash: &str) -> Option<bool> {
        None
    }

    /// Render a component's script tag given its source path.
    fn script(&self, _source_path: &str) -> Option<String> {
        None
    }
}

/// Oracle backed by a fixed set of `name:hash` tokens.
///
/// The split happens at the last `:`, so names containing colons
/// (`chunk:debounce:abc123`) parse as expected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownEntries {
    /// Entry name to the content hashes held for it.
    entries: HashMap<String, HashSet<String>>,
}

impl KnownEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma- or whitespace-separated token list, e.g. a cookie value.
    /// Tokens without a `:` are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut known = KnownEntries::new();
        for token in raw.split(|c: char| c == ',' || c.is_whitespace()) {
            if let Some((name, hash)) = token.rsplit_once(':') {
                if !name.is_empty() && !hash.is_empty() {
                    known.insert(name, hash);
                }
            }
        }
        known
    }

    pub fn insert(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.entries.entry(name.into()).or_default().insert(hash.into());
    }

    /// Number of distinct `name:hash` tokens.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheOracle for KnownEntries {
    fn has_cached_entry(&self, name: &str, hash: &str) -> Option<bool> {
        Some(
            self.entries
                .get(name)
                .is_some_and(|hashes| hashes.contains(hash)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl CacheOracle for Bare {}

    #[test]
    fn default_capabilities_are_absent() {
        assert_eq!(Bare.has_cached_entry("a", "b"), None);
        assert_eq!(Bare.script("a.js"), None);
    }

    #[test]
    fn parse_splits_on_last_colon() {
        let known = KnownEntries::parse("chunk:debounce:abc123, client:c1 manifest:m1");
        assert_eq!(known.len(), 3);
        assert_eq!(known.has_cached_entry("chunk:debounce", "abc123"), Some(true));
        assert_eq!(known.has_cached_entry("client", "c1"), Some(true));
        assert_eq!(known.has_cached_entry("client", "c2"), Some(false));
    }

    #[test]
    fn one_name_may_hold_several_hashes() {
        let mut known = KnownEntries::parse("client:c1 client:c2 client:c1");
        assert_eq!(known.len(), 2);
        assert_eq!(known.has_cached_entry("client", "c2"), Some(true));
        assert_eq!(known.has_cached_entry("manifest", "c1"), Some(false));

        known.insert("manifest", "m1");
        assert_eq!(known.len(), 3);
        assert_eq!(known.has_cached_entry("manifest", "m1"), Some(true));
    }

    #[test]
    fn parse_ignores_garbage() {
        let known = KnownEntries::parse("nocolon, :nohash-name, trailing: ,,");
        assert!(known.is_empty());
    }
}
