//! `savaeat-server` entry point.

use std::path::PathBuf;

use clap::Parser;
use savaeat_axum::{ServerConfig, start_server};
use savaeat_osrm::DEFAULT_OSRM_URL;

/// Savaeat marketplace API server.
#[derive(Debug, Parser)]
#[command(name = "savaeat-server", version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "SAVAEAT_PORT", default_value_t = 8080)]
    port: u16,

    /// `SQLite` database file (defaults to the platform data directory).
    #[arg(long, env = "SAVAEAT_DATABASE")]
    database: Option<PathBuf>,

    /// Directory holding the built web app.
    #[arg(long, env = "SAVAEAT_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Allowed CORS origin; repeat for several. Any origin when omitted.
    #[arg(long = "allowed-origin", env = "SAVAEAT_ALLOWED_ORIGIN", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// OSRM server for directions.
    #[arg(long, env = "SAVAEAT_OSRM_URL", default_value = DEFAULT_OSRM_URL)]
    osrm_url: String,

    /// Disable the directions endpoint.
    #[arg(long)]
    no_directions: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig {
            port: self.port,
            database_path: self.database,
            osrm_url: (!self.no_directions).then_some(self.osrm_url),
            ..ServerConfig::default()
        };
        if let Some(dir) = self.static_dir {
            config = config.with_static_dir(dir);
        }
        if !self.allowed_origins.is_empty() {
            config = config.with_allowed_origins(self.allowed_origins);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Args::parse().into_config();
    start_server(config).await
}
