// src/main.rs

//! avalon-sitemap CLI
//!
//! Builds the sitemap from the configured backend once, then serves it.
//! `generate` writes the document to stdout instead; `validate` only
//! resolves the configuration.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

use avalon_sitemap::{
    config::Config,
    error::Result,
    pipeline,
    server::{self, AppContext},
};

/// Avalon sitemap generator and server
#[derive(Parser, Debug)]
#[command(
    name = "avalon-sitemap",
    version,
    about = "Generates and serves sitemap.xml for an Avalon digital library"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the sitemap and serve it over HTTP (default)
    Serve {
        /// Listen address (overrides SITEMAP_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Build the sitemap and write the XML document to stdout
    Generate,

    /// Resolve the configuration and report what would be used
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a .env file, if any, before reading the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            let outcome = pipeline::run_build(&config).await?;
            let addr = bind.unwrap_or(config.bind);
            server::serve(addr, AppContext::new(outcome.xml)).await?;
        }

        Command::Generate => {
            let outcome = pipeline::run_build(&config).await?;
            print!("{}", outcome.xml);
        }

        Command::Validate => {
            log::info!("Configuration OK");
            log::info!("  backend: {}", config.backend.kind());
            log::info!("  public URL: {}", config.public_url);
            log::info!("  listen address: {}", config.bind);
        }
    }

    Ok(())
}
