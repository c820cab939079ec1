//! Subcommands and the manifest/cache arguments they share.

pub mod component;
pub mod head;
pub mod hints;
pub mod resolve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use modmap_core::manifest;
use modmap_renderer::{KnownEntries, RenderSession, RenderWarning, Renderer, RendererConfig};

/// Manifest, config and client cache state.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Path to the build manifest JSON.
    #[arg(long, short = 'm')]
    pub manifest: PathBuf,

    /// Render config YAML (global names, cache marker attributes, template dir).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Entry the client already has cached, as `name:hash`. Repeatable.
    /// When given, rendering consults this set as the cache oracle.
    #[arg(long = "cached", value_name = "NAME:HASH")]
    pub cached: Vec<String>,
}

impl ManifestArgs {
    pub fn renderer(&self) -> Result<Renderer> {
        let config = match self.config.as_ref() {
            Some(path) => {
                let config = RendererConfig::load_at(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?;
                tracing::debug!("loaded render config {}", path.display());
                config
            }
            None => RendererConfig::default(),
        };
        let manifest = manifest::load_at(&self.manifest)
            .with_context(|| format!("failed to load manifest {}", self.manifest.display()))?;
        tracing::debug!(
            "loaded manifest {} ({} components, {} chunks)",
            self.manifest.display(),
            manifest.components.len(),
            manifest.chunks.len()
        );
        Renderer::with_config(manifest, config).context("failed to build renderer")
    }

    pub fn oracle(&self) -> Option<KnownEntries> {
        if self.cached.is_empty() {
            return None;
        }
        Some(KnownEntries::parse(&self.cached.join(",")))
    }
}

pub fn open_session<'a>(renderer: &'a Renderer, oracle: Option<&'a KnownEntries>) -> RenderSession<'a> {
    match oracle {
        Some(known) => renderer.session_with_oracle(known),
        None => renderer.session(),
    }
}

pub fn print_warnings(warnings: Vec<RenderWarning>) {
    for warning in warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
}
