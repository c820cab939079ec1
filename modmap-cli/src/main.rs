//! modmap — preview import maps, script tags and early hints from a build manifest.
//!
//! # Usage
//!
//! ```text
//! modmap head --manifest <path> [--config <yaml>] [--cached name:hash]...
//! modmap component <name>... --manifest <path> [--inline-deps] [--cached name:hash]...
//! modmap hints <name>... --manifest <path> [--json] [--cached name:hash]...
//! modmap resolve <name> --manifest <path>
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    component::ComponentArgs, head::HeadArgs, hints::HintsArgs, resolve::ResolveArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "modmap",
    version,
    about = "Render ES module loading tags from a build-time dependency manifest",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the import map, manifest script and client script.
    Head(HeadArgs),

    /// Render one or more components in a single page session.
    Component(ComponentArgs),

    /// List the HTTP 103 Early Hints for the given components.
    Hints(HintsArgs),

    /// Print the URL of a component or module specifier.
    Resolve(ResolveArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Head(args) => args.run(),
        Commands::Component(args) => args.run(),
        Commands::Hints(args) => args.run(),
        Commands::Resolve(args) => args.run(),
    }
}
