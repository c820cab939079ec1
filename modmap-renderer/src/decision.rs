//! Caching decision: inline, inline with cache markers, or reference.
//!
//! | oracle                   | head script / chunk delivery |
//! |--------------------------|------------------------------|
//! | absent (or no lookup)    | [`Delivery::Inline`]         |
//! | entry cached             | [`Delivery::Reference`]      |
//! | entry not cached         | [`Delivery::InlineTracked`]  |
//!
//! For chunks "inline" means the chunk's data URL as the import-map value,
//! which is only used when the caller asked for `inline_deps`. A cached
//! chunk is always referenced by its real URL, whatever `inline_deps` says.

use crate::oracle::CacheOracle;

/// How a single entry reaches the browser on this render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Inline content, no cache markers.
    Inline,
    /// Inline content plus cache markers so the caching layer can persist it.
    InlineTracked,
    /// Client already holds the bytes; emit a reference to the real URL.
    Reference,
}

impl Delivery {
    pub fn is_tracked(self) -> bool {
        matches!(self, Delivery::InlineTracked)
    }
}

/// Decide delivery for entry `(name, hash)`.
pub fn decide(oracle: Option<&dyn CacheOracle>, name: &str, hash: &str) -> Delivery {
    match oracle.and_then(|o| o.has_cached_entry(name, hash)) {
        None => Delivery::Inline,
        Some(true) => Delivery::Reference,
        Some(false) => Delivery::InlineTracked,
    }
}

/// Resolved delivery of a chunk dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDelivery {
    /// Map the specifier to the data URL instead of the real URL.
    pub use_data_url: bool,
    /// Attach cache markers to the override import map.
    pub markers: bool,
}

impl ChunkDelivery {
    pub fn from_delivery(delivery: Delivery, inline_deps: bool) -> Self {
        ChunkDelivery {
            use_data_url: inline_deps && delivery != Delivery::Reference,
            markers: delivery.is_tracked(),
        }
    }

    /// A data-URL mapping is the content itself; there is nothing to preload.
    pub fn wants_preload(&self) -> bool {
        !self.use_data_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::KnownEntries;

    struct ScriptOnly;
    impl CacheOracle for ScriptOnly {
        fn script(&self, source_path: &str) -> Option<String> {
            Some(source_path.to_string())
        }
    }

    #[test]
    fn no_oracle_inlines() {
        assert_eq!(decide(None, "client", "c1"), Delivery::Inline);
    }

    #[test]
    fn oracle_without_lookup_behaves_like_none() {
        assert_eq!(decide(Some(&ScriptOnly), "client", "c1"), Delivery::Inline);
    }

    #[test]
    fn cached_and_uncached() {
        let known = KnownEntries::parse("client:c1");
        assert_eq!(decide(Some(&known), "client", "c1"), Delivery::Reference);
        assert_eq!(decide(Some(&known), "client", "c2"), Delivery::InlineTracked);
    }

    #[test]
    fn cached_chunk_never_uses_data_url() {
        let d = ChunkDelivery::from_delivery(Delivery::Reference, true);
        assert!(!d.use_data_url);
        assert!(!d.markers);
        assert!(d.wants_preload());
    }
}
