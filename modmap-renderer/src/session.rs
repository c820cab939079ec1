//! Request-scoped render state and the rendering operations.
//!
//! A [`RenderSession`] lives for one page render. It guarantees, per page:
//!
//! - each head script (import map, manifest, client) is emitted at most once;
//! - each component script is emitted at most once;
//! - each chunk gets exactly one override import map;
//! - each chunk gets at most one modulepreload / Early Hint.
//!
//! Anomalies never fail the render: they produce an empty fragment and a
//! [`RenderWarning`], also logged through `tracing`.
//!
//! # Precondition
//!
//! Callers must emit the manifest script before the client script;
//! the client loader reads the global manifest synchronously.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use modmap_core::{Manifest, ScriptEntry};

use crate::context::{CacheMarkers, ImportMapTag, LegacyManifestTag, PreloadTag, ScriptTag};
use crate::decision::{decide, ChunkDelivery, Delivery};
use crate::engine::{
    Renderer, IMPORTMAP_TEMPLATE, LEGACY_MANIFEST_TEMPLATE, MODULEPRELOAD_TEMPLATE,
    SCRIPT_TEMPLATE,
};
use crate::error::RenderError;
use crate::hints::EarlyHint;
use crate::oracle::CacheOracle;

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// The one-shot head scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadScript {
    ImportMap,
    ManifestScript,
    ClientScript,
}

impl fmt::Display for HeadScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadScript::ImportMap => write!(f, "import map"),
            HeadScript::ManifestScript => write!(f, "manifest script"),
            HeadScript::ClientScript => write!(f, "client script"),
        }
    }
}

/// Non-fatal rendering diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderWarning {
    #[error("{0} already rendered; call only once")]
    AlreadyRendered(HeadScript),

    #[error("component '{0}' not found in manifest")]
    UnknownComponent(String),

    #[error("component name must not be empty")]
    EmptyComponentName,
}

// ---------------------------------------------------------------------------
// Render state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RenderState {
    import_map_done: bool,
    manifest_script_done: bool,
    client_script_done: bool,
    rendered_components: HashSet<String>,
    handled_chunks: HashSet<String>,
    preloaded: HashSet<String>,
}

impl RenderState {
    /// Flip the one-shot flag for `script`; `false` if it was already set.
    fn claim(&mut self, script: HeadScript) -> bool {
        let flag = match script {
            HeadScript::ImportMap => &mut self.import_map_done,
            HeadScript::ManifestScript => &mut self.manifest_script_done,
            HeadScript::ClientScript => &mut self.client_script_done,
        };
        !std::mem::replace(flag, true)
    }
}

/// JSON for a script body: literal `/`, but never a closing `</script>`.
fn script_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, RenderError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json.replace("</", "<\\/"))
}

/// Inline script source with any `</script` (any case) broken up as `<\/script`.
fn script_body(content: &str) -> String {
    const CLOSE: &[u8] = b"</script";
    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut start = 0;
    let mut i = 0;
    while i + CLOSE.len() <= bytes.len() {
        if bytes[i..i + CLOSE.len()].eq_ignore_ascii_case(CLOSE) {
            out.push_str(&content[start..=i]);
            out.push('\\');
            start = i + 1;
            i += CLOSE.len();
        } else {
            i += 1;
        }
    }
    out.push_str(&content[start..]);
    out
}

fn join_fragments(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// RenderSession
// ---------------------------------------------------------------------------

/// One page render against a shared [`Renderer`].
pub struct RenderSession<'a> {
    renderer: &'a Renderer,
    oracle: Option<&'a dyn CacheOracle>,
    state: RenderState,
    warnings: Vec<RenderWarning>,
}

impl<'a> RenderSession<'a> {
    pub(crate) fn new(renderer: &'a Renderer, oracle: Option<&'a dyn CacheOracle>) -> Self {
        RenderSession {
            renderer,
            oracle,
            state: RenderState::default(),
            warnings: Vec::new(),
        }
    }

    /// The manifest this session renders from.
    pub fn manifest(&self) -> &'a Manifest {
        self.renderer.manifest()
    }

    fn warn(&mut self, warning: RenderWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn claim_or_warn(&mut self, script: HeadScript) -> bool {
        if self.state.claim(script) {
            return true;
        }
        self.warn(RenderWarning::AlreadyRendered(script));
        false
    }

    /// Warnings recorded so far, oldest first.
    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// Drain the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<RenderWarning> {
        std::mem::take(&mut self.warnings)
    }

    // -----------------------------------------------------------------------
    // Head scripts
    // -----------------------------------------------------------------------

    /// `<script type="importmap">` with the manifest's static import map.
    pub fn render_import_map(&mut self) -> Result<String, RenderError> {
        if !self.claim_or_warn(HeadScript::ImportMap) {
            return Ok(String::new());
        }
        let tag = ImportMapTag {
            json: script_json(&self.manifest().import_map, true)?,
            markers: None,
        };
        self.renderer.engine().render_tag(IMPORTMAP_TEMPLATE, &tag)
    }

    /// Script that populates the global component manifest.
    ///
    /// Always blocking (no `defer`/`async`). The legacy manifest shape is
    /// always inlined and never consults the cache oracle.
    pub fn render_manifest_script(&mut self) -> Result<String, RenderError> {
        if !self.claim_or_warn(HeadScript::ManifestScript) {
            return Ok(String::new());
        }
        match self.manifest().manifest_script.as_ref() {
            Some(entry) => {
                let name = self.renderer.config().manifest_entry.clone();
                self.render_cached_script(&name, entry, false)
            }
            None => self.render_legacy_manifest(),
        }
    }

    /// The runtime loader, always as a module script.
    pub fn render_client_script(&mut self) -> Result<String, RenderError> {
        if !self.claim_or_warn(HeadScript::ClientScript) {
            return Ok(String::new());
        }
        let name = self.renderer.config().client_entry.clone();
        self.render_cached_script(&name, &self.manifest().client, true)
    }

    /// Import map, manifest script and client script, in that order.
    pub fn render_head_scripts(&mut self) -> Result<String, RenderError> {
        let parts = vec![
            self.render_import_map()?,
            self.render_manifest_script()?,
            self.render_client_script()?,
        ];
        Ok(join_fragments(parts))
    }

    fn render_legacy_manifest(&self) -> Result<String, RenderError> {
        let config = self.renderer.config();
        let tag = LegacyManifestTag {
            global_json: script_json(&config.manifest_global, false)?,
            components_json: script_json(&self.manifest().components, false)?,
            event_json: script_json(&config.ready_event, false)?,
        };
        self.renderer.engine().render_tag(LEGACY_MANIFEST_TEMPLATE, &tag)
    }

    fn render_cached_script(
        &self,
        name: &str,
        entry: &ScriptEntry,
        module: bool,
    ) -> Result<String, RenderError> {
        let delivery = decide(self.oracle, name, &entry.hash);
        tracing::debug!("{name}:{} -> {delivery:?}", entry.hash);
        let tag = match delivery {
            Delivery::Reference => ScriptTag {
                module,
                src: Some(entry.url.clone()),
                body: None,
                markers: None,
            },
            Delivery::Inline => ScriptTag {
                module,
                src: None,
                body: Some(script_body(&entry.content)),
                markers: None,
            },
            Delivery::InlineTracked => ScriptTag {
                module,
                src: None,
                body: Some(script_body(&entry.content)),
                markers: Some(CacheMarkers::new(
                    self.renderer.config(),
                    name,
                    &entry.hash,
                    &entry.url,
                )),
            },
        };
        self.renderer.engine().render_tag(SCRIPT_TEMPLATE, &tag)
    }

    // -----------------------------------------------------------------------
    // Components
    // -----------------------------------------------------------------------

    /// Render a component's chunk import maps, preloads and own script.
    ///
    /// With `inline_deps`, uncached chunks are mapped to their data URL and
    /// not preloaded. Rendering the same component again yields `""`.
    pub fn render_component(&mut self, name: &str, inline_deps: bool) -> Result<String, RenderError> {
        if name.is_empty() {
            self.warn(RenderWarning::EmptyComponentName);
            return Ok(String::new());
        }
        let Some(component) = self.manifest().component(name) else {
            self.warn(RenderWarning::UnknownComponent(name.to_string()));
            return Ok(String::new());
        };
        if !self.state.rendered_components.insert(name.to_string()) {
            return Ok(String::new());
        }

        let engine = self.renderer.engine();
        let mut import_maps = Vec::new();
        let mut preloads = Vec::new();

        for dep in &component.dependencies {
            let specifier = dep.0.as_str();
            if self.state.handled_chunks.contains(specifier) {
                continue;
            }
            // Not a chunk: already covered by the static import map.
            let Some(chunk) = self.manifest().chunk(specifier) else {
                continue;
            };

            let delivery = ChunkDelivery::from_delivery(
                decide(self.oracle, specifier, &chunk.hash),
                inline_deps,
            );
            tracing::debug!("{specifier}:{} -> {delivery:?}", chunk.hash);

            let mapped = if delivery.use_data_url {
                &chunk.data_url
            } else {
                &chunk.url
            };
            let mut imports = serde_json::Map::new();
            imports.insert(specifier.to_string(), mapped.clone().into());
            let tag = ImportMapTag {
                json: script_json(&serde_json::json!({ "imports": imports }), false)?,
                markers: delivery.markers.then(|| {
                    CacheMarkers::new(self.renderer.config(), specifier, &chunk.hash, &chunk.url)
                }),
            };
            import_maps.push(engine.render_tag(IMPORTMAP_TEMPLATE, &tag)?);

            if delivery.wants_preload() && self.state.preloaded.insert(specifier.to_string()) {
                let tag = PreloadTag {
                    href: chunk.url.clone(),
                };
                preloads.push(engine.render_tag(MODULEPRELOAD_TEMPLATE, &tag)?);
            }

            self.state.handled_chunks.insert(specifier.to_string());
        }

        let own_script = match self.oracle.and_then(|o| o.script(&component.src)) {
            Some(html) => html,
            None => engine.render_tag(
                SCRIPT_TEMPLATE,
                &ScriptTag {
                    module: true,
                    src: Some(component.url.clone()),
                    body: None,
                    markers: None,
                },
            )?,
        };

        let mut parts = import_maps;
        parts.extend(preloads);
        parts.push(own_script);
        Ok(join_fragments(parts))
    }

    // -----------------------------------------------------------------------
    // Early hints
    // -----------------------------------------------------------------------

    /// Preload hints for the chunks of `components`, for an HTTP 103 response.
    ///
    /// Shares the preload set with [`render_component`](Self::render_component),
    /// so a chunk is hinted or preloaded once per session whichever runs first.
    /// Unknown components and non-chunk dependencies are skipped silently.
    pub fn early_hints<S: AsRef<str>>(&mut self, components: &[S]) -> Vec<EarlyHint> {
        let manifest = self.manifest();
        let mut hints = Vec::new();
        for name in components {
            let Some(component) = manifest.component(name.as_ref()) else {
                continue;
            };
            for dep in &component.dependencies {
                let specifier = dep.0.as_str();
                if self.state.preloaded.contains(specifier) {
                    continue;
                }
                let Some(chunk) = manifest.chunk(specifier) else {
                    continue;
                };
                let cached = self
                    .oracle
                    .and_then(|o| o.has_cached_entry(specifier, &chunk.hash))
                    .unwrap_or(false);
                if cached {
                    continue;
                }
                self.state.preloaded.insert(specifier.to_string());
                hints.push(EarlyHint::preload_script(chunk.url.clone()));
            }
        }
        hints
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn component_url(&self, name: &str) -> Option<&'a str> {
        self.manifest().component_url(name)
    }

    pub fn module_url(&self, specifier: &str) -> Option<&'a str> {
        self.manifest().module_url(specifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_one_shot_per_script() {
        let mut state = RenderState::default();
        assert!(state.claim(HeadScript::ImportMap));
        assert!(!state.claim(HeadScript::ImportMap));
        assert!(state.claim(HeadScript::ClientScript));
        assert!(state.claim(HeadScript::ManifestScript));
        assert!(!state.claim(HeadScript::ManifestScript));
    }

    #[test]
    fn script_json_keeps_slashes_but_breaks_closing_tags() {
        let json = script_json(&serde_json::json!({ "a": "/x.js", "b": "</script>" }), false).unwrap();
        assert_eq!(json, r#"{"a":"/x.js","b":"<\/script>"}"#);
    }

    #[test]
    fn script_body_breaks_closing_tags_in_any_case() {
        assert_eq!(script_body("a</b></SCRIPT>x</script"), r"a</b><\/SCRIPT>x<\/script");
        assert_eq!(script_body("plain() // ok"), "plain() // ok");
        assert_eq!(script_body("é</Script>é"), r"é<\/Script>é");
    }

    #[test]
    fn join_skips_empty_fragments() {
        let joined = join_fragments(vec!["a".into(), String::new(), "b".into()]);
        assert_eq!(joined, "a\nb");
    }

    #[test]
    fn warning_messages() {
        assert_eq!(
            RenderWarning::AlreadyRendered(HeadScript::ImportMap).to_string(),
            "import map already rendered; call only once"
        );
        assert_eq!(
            RenderWarning::UnknownComponent("x".into()).to_string(),
            "component 'x' not found in manifest"
        );
    }
}
