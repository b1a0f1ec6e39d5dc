//! radioman CLI - users/posts web backend
//!
//! Entry point for the `radioman` binary. Loads `.env`, sets up tracing and
//! dispatches to the subcommand.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "radioman",
    author,
    version,
    about = "Small JSON API for users and posts over SQLite"
)]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (users, posts, static front page)
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before parsing so clap's env fallbacks see .env values.
    // dotenvy never overrides variables that are already set.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => tracing::warn!("failed to parse .env: {}", e),
    }

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
    }
}
