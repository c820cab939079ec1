//! # modmap-renderer
//!
//! Renders import maps, script tags and preload hints from a build-time
//! module manifest, so ES module components load in parallel instead of
//! in a request waterfall.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use modmap_renderer::{KnownEntries, Renderer};
//!
//! fn render_page(renderer: &Renderer, cookie: &str) -> Result<String, modmap_renderer::RenderError> {
//!     let cached = KnownEntries::parse(cookie);
//!     let mut session = renderer.session_with_oracle(&cached);
//!     let mut html = session.render_head_scripts()?;
//!     html.push('\n');
//!     html.push_str(&session.render_component("search", true)?);
//!     for warning in session.take_warnings() {
//!         eprintln!("{warning}");
//!     }
//!     Ok(html)
//! }
//! ```

pub mod config;
pub mod context;
pub mod decision;
pub mod engine;
pub mod error;
pub mod hints;
pub mod oracle;
pub mod session;

pub use config::RendererConfig;
pub use decision::{ChunkDelivery, Delivery};
pub use engine::{Renderer, TemplateEngine};
pub use error::RenderError;
pub use hints::{link_header_value, EarlyHint};
pub use oracle::{CacheOracle, KnownEntries};
pub use session::{HeadScript, RenderSession, RenderWarning};
