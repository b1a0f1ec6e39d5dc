//! HTTP server command
//!
//! Every flag falls back to an environment variable, so a `.env` file next
//! to the binary is enough to configure a deployment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use radioman_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// SQLite database file (created if missing)
    #[arg(long, env = "DATABASE_PATH", default_value = "./database.sqlite")]
    pub db_path: PathBuf,

    /// Directory of static files; `/` serves its index.html
    #[arg(long, env = "PUBLIC_DIR", default_value = "./public")]
    pub public_dir: PathBuf,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            db_path: self.db_path.clone(),
            public_dir: self.public_dir.clone(),
            max_connections: self.max_connections,
        }
    }
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.to_config();

    if !config.public_dir.join("index.html").exists() {
        tracing::warn!(
            public_dir = %config.public_dir.display(),
            "index.html not found; GET / will return 404"
        );
    }

    tracing::info!("Starting radioman server on {}", config.bind_addr);

    run_server(config).await.context("Server error")?;

    Ok(())
}
