//! `modmap head` — render the head scripts.

use anyhow::Result;
use clap::Args;

use super::{open_session, print_warnings, ManifestArgs};

/// Arguments for `modmap head`.
#[derive(Args, Debug)]
pub struct HeadArgs {
    #[command(flatten)]
    pub source: ManifestArgs,
}

impl HeadArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.source.renderer()?;
        let oracle = self.source.oracle();
        let mut session = open_session(&renderer, oracle.as_ref());

        let html = session.render_head_scripts()?;
        println!("{html}");
        print_warnings(session.take_warnings());
        Ok(())
    }
}
