//! `modmap component` — render components as one page would.

use anyhow::{Context, Result};
use clap::Args;

use super::{open_session, print_warnings, ManifestArgs};

/// Arguments for `modmap component`.
#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Component names, rendered in order within a single session.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Map uncached chunks to data URLs instead of preloading them.
    #[arg(long)]
    pub inline_deps: bool,

    /// Also render the head scripts before the components.
    #[arg(long)]
    pub with_head: bool,

    #[command(flatten)]
    pub source: ManifestArgs,
}

impl ComponentArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.source.renderer()?;
        let oracle = self.source.oracle();
        let mut session = open_session(&renderer, oracle.as_ref());

        if self.with_head {
            let head = session.render_head_scripts()?;
            if !head.is_empty() {
                println!("{head}");
            }
        }
        for name in &self.names {
            let html = session
                .render_component(name, self.inline_deps)
                .with_context(|| format!("render failed for '{name}'"))?;
            if !html.is_empty() {
                println!("{html}");
            }
        }
        print_warnings(session.take_warnings());
        Ok(())
    }
}
