//! `modmap resolve <name>` — component URL, else module URL.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::ManifestArgs;

/// Arguments for `modmap resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Component name or module specifier.
    pub name: String,

    #[command(flatten)]
    pub source: ManifestArgs,
}

impl ResolveArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.source.renderer()?;
        let url = renderer
            .component_url(&self.name)
            .or_else(|| renderer.module_url(&self.name));
        match url {
            Some(url) => println!("{url}"),
            None => eprintln!("{} '{}' is not in the manifest", "warning:".yellow().bold(), self.name),
        }
        Ok(())
    }
}
