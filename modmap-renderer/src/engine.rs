//! Tera tag engine — [`TemplateEngine`] and [`Renderer`].
//!
//! # Tag templates
//!
//! | Template                     | Emits                                        |
//! |------------------------------|----------------------------------------------|
//! | `importmap.html.tera`        | `<script type="importmap">…</script>`        |
//! | `script.html.tera`           | `<script>` inline, external or tracked       |
//! | `modulepreload.html.tera`    | `<link rel="modulepreload" href="…">`        |
//! | `legacy_manifest.html.tera`  | global manifest assignment + ready event     |
//!
//! Autoescape is off: script bodies are JS/JSON and must pass through
//! untouched. Attribute values go through the `attr` filter instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Tera, Value};

use modmap_core::{manifest, Manifest};

use crate::config::RendererConfig;
use crate::context::to_tera_context;
use crate::error::{io_err, RenderError};
use crate::oracle::CacheOracle;
use crate::session::RenderSession;

pub const IMPORTMAP_TEMPLATE: &str = "importmap.html.tera";
pub const SCRIPT_TEMPLATE: &str = "script.html.tera";
pub const MODULEPRELOAD_TEMPLATE: &str = "modulepreload.html.tera";
pub const LEGACY_MANIFEST_TEMPLATE: &str = "legacy_manifest.html.tera";

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    (IMPORTMAP_TEMPLATE, include_str!("templates/importmap.html.tera")),
    (SCRIPT_TEMPLATE, include_str!("templates/script.html.tera")),
    (
        MODULEPRELOAD_TEMPLATE,
        include_str!("templates/modulepreload.html.tera"),
    ),
    (
        LEGACY_MANIFEST_TEMPLATE,
        include_str!("templates/legacy_manifest.html.tera"),
    ),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("tag template override: {name}");
        templates.push((name, contents));
    }
    Ok(templates)
}

/// `attr` filter: escape a value for a double-quoted HTML attribute.
fn attr_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(Value::String(
        html_escape::encode_double_quoted_attribute(&raw).into_owned(),
    ))
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("attr", attr_filter);
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering tag templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded
/// defaults by relative name (e.g. `script.html.tera`).
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render one tag. Trailing newlines left by template files are dropped.
    pub fn render_tag<T: Serialize>(&self, template: &str, tag: &T) -> Result<String, RenderError> {
        let ctx = to_tera_context(tag)?;
        let out = self.tera.render(template, &ctx)?;
        Ok(out.trim_end_matches(['\r', '\n']).to_string())
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Immutable manifest + tag templates, shared by every render session.
///
/// Build once at startup and hand out one [`RenderSession`] per page render.
/// The renderer itself holds no render-state and is safe to share across
/// threads.
pub struct Renderer {
    manifest: Manifest,
    config: RendererConfig,
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a [`Renderer`] with the default config and embedded templates.
    pub fn new(manifest: Manifest) -> Result<Self, RenderError> {
        Self::with_config(manifest, RendererConfig::default())
    }

    pub fn with_config(manifest: Manifest, config: RendererConfig) -> Result<Self, RenderError> {
        let engine = TemplateEngine::new(config.template_dir.as_deref())?;
        Ok(Renderer {
            manifest,
            config,
            engine,
        })
    }

    /// Load the manifest JSON at `path` and construct a [`Renderer`].
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        Self::new(manifest::load_at(path)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        Self::new(manifest::from_json_str(json)?)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub(crate) fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn component_url(&self, name: &str) -> Option<&str> {
        self.manifest.component_url(name)
    }

    pub fn module_url(&self, specifier: &str) -> Option<&str> {
        self.manifest.module_url(specifier)
    }

    /// Start a render session with no caching layer.
    pub fn session(&self) -> RenderSession<'_> {
        RenderSession::new(self, None)
    }

    /// Start a render session that consults `oracle` for caching decisions.
    pub fn session_with_oracle<'a>(&'a self, oracle: &'a dyn CacheOracle) -> RenderSession<'a> {
        RenderSession::new(self, Some(oracle))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PreloadTag, ScriptTag};
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{"client":{"url":"/c.js","hash":"1","content":""}}"#;

    #[test]
    fn engine_new_succeeds() {
        TemplateEngine::new(None).expect("embedded templates must compile");
    }

    #[test]
    fn attr_filter_escapes_quotes_and_angles() {
        let engine = TemplateEngine::new(None).unwrap();
        let out = engine
            .render_tag(
                MODULEPRELOAD_TEMPLATE,
                &PreloadTag {
                    href: r#"/a.js?x="<y>"&z"#.to_string(),
                },
            )
            .unwrap();
        assert_eq!(
            out,
            r#"<link rel="modulepreload" href="/a.js?x=&quot;&lt;y&gt;&quot;&amp;z">"#
        );
    }

    #[test]
    fn script_body_is_not_escaped() {
        let engine = TemplateEngine::new(None).unwrap();
        let out = engine
            .render_tag(
                SCRIPT_TEMPLATE,
                &ScriptTag {
                    module: true,
                    src: None,
                    body: Some("if (a < b && c) {}".to_string()),
                    markers: None,
                },
            )
            .unwrap();
        assert_eq!(out, r#"<script type="module">if (a < b && c) {}</script>"#);
    }

    #[test]
    fn user_template_override_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(MODULEPRELOAD_TEMPLATE),
            "<link rel=\"preload\" as=\"script\" href=\"{{ href | attr }}\">\n",
        )
        .unwrap();

        let engine = TemplateEngine::new(Some(dir.path())).unwrap();
        let out = engine
            .render_tag(
                MODULEPRELOAD_TEMPLATE,
                &PreloadTag {
                    href: "/a.js".to_string(),
                },
            )
            .unwrap();
        assert_eq!(out, r#"<link rel="preload" as="script" href="/a.js">"#);
    }

    #[test]
    fn broken_user_template_fails_construction() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SCRIPT_TEMPLATE), "{% if %}").unwrap();
        let err = TemplateEngine::new(Some(dir.path())).err().expect("must fail");
        assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
    }

    #[test]
    fn missing_override_dir_is_ignored() {
        let dir = TempDir::new().unwrap();
        TemplateEngine::new(Some(&dir.path().join("absent"))).expect("engine");
    }

    #[test]
    fn renderer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Renderer>();
        let renderer = Renderer::from_json(MINIMAL).unwrap();
        assert_eq!(renderer.manifest().client.url, "/c.js");
    }
}
