//! `modmap hints` — Early Hints for a set of components.

use anyhow::Result;
use clap::Args;

use modmap_renderer::link_header_value;

use super::{open_session, ManifestArgs};

/// Arguments for `modmap hints`.
#[derive(Args, Debug)]
pub struct HintsArgs {
    /// Components the page is going to render.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Emit the hint records as JSON instead of a `Link` header.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: ManifestArgs,
}

impl HintsArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.source.renderer()?;
        let oracle = self.source.oracle();
        let mut session = open_session(&renderer, oracle.as_ref());

        let hints = session.early_hints(&self.names);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&hints)?);
            return Ok(());
        }
        if hints.is_empty() {
            eprintln!("No early hints for {}.", self.names.join(", "));
            return Ok(());
        }
        println!("Link: {}", link_header_value(&hints));
        Ok(())
    }
}
