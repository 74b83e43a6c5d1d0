//! Axum server bootstrap - the composition root.
//!
//! The only place where the database, the routing client and the SSE
//! broadcaster are instantiated and wired into `AppCore`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use savaeat_core::paths::database_path;
use savaeat_core::services::AppCore;
use savaeat_core::{AppEventEmitter, RoutingPort};
use savaeat_db::{CoreFactory, SqlitePool, setup_database};
use savaeat_osrm::{DEFAULT_OSRM_URL, DefaultOsrmClient, OsrmClientConfig};

use crate::sse::SseBroadcaster;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Built web app to serve alongside the API.
    pub static_dir: Option<PathBuf>,
    pub cors: CorsConfig,
    /// OSRM server base URL. `None` disables directions.
    pub osrm_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_path: None,
            static_dir: None,
            cors: CorsConfig::default(),
            osrm_url: Some(DEFAULT_OSRM_URL.to_string()),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }
}

/// Shared state behind every handler.
pub struct AxumContext {
    pub core: Arc<AppCore>,
    /// Change feed; also the core's event emitter.
    pub sse: Arc<SseBroadcaster>,
}

impl AxumContext {
    /// Wire a context over an already-open pool.
    ///
    /// Used by `bootstrap` and by router tests over an in-memory database.
    pub fn from_pool(pool: SqlitePool, routing: Option<Arc<dyn RoutingPort>>) -> Self {
        let sse = Arc::new(SseBroadcaster::with_defaults());
        let emitter: Arc<dyn AppEventEmitter> = sse.clone();

        let mut core = CoreFactory::build_app_core(pool, emitter);
        if let Some(routing) = routing {
            core = core.with_routing(routing);
        }

        Self {
            core: Arc::new(core),
            sse,
        }
    }
}

/// Open the database, build the routing client and assemble the context.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let db_path = match &config.database_path {
        Some(path) => path.clone(),
        None => database_path()?,
    };
    tracing::info!(
        target: "savaeat.bootstrap",
        database_path = %db_path.display(),
        osrm_url = config.osrm_url.as_deref().unwrap_or("disabled"),
        "resolved configuration"
    );

    let pool = setup_database(&db_path).await?;

    let routing: Option<Arc<dyn RoutingPort>> = match &config.osrm_url {
        Some(url) => {
            let osrm_config = OsrmClientConfig::new().with_base_url(url.clone());
            Some(Arc::new(DefaultOsrmClient::new(&osrm_config)?))
        }
        None => None,
    };

    Ok(AxumContext::from_pool(pool, routing))
}

/// Start the web server on the configured port.
///
/// With `static_dir` set the web app is served too; otherwise only the API.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config).await?;

    let app = if let Some(ref static_dir) = config.static_dir {
        info!(target: "savaeat.bootstrap", static_dir = %static_dir.display(), "serving web app");
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(target: "savaeat.bootstrap", %addr, "savaeat server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_enables_public_osrm() {
        let config = ServerConfig::default();
        assert_eq!(config.osrm_url.as_deref(), Some(DEFAULT_OSRM_URL));
        assert!(config.database_path.is_none());
        assert!(matches!(config.cors, CorsConfig::AllowAll));
    }

    #[test]
    fn test_builders() {
        let config = ServerConfig::default()
            .with_static_dir("web/dist")
            .with_allowed_origins(vec!["https://savaeat.app".to_string()])
            .with_database_path("/tmp/savaeat.db");
        assert_eq!(config.static_dir, Some(PathBuf::from("web/dist")));
        assert!(matches!(config.cors, CorsConfig::AllowOrigins(ref o) if o.len() == 1));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/savaeat.db")));
    }

    #[tokio::test]
    async fn test_bootstrap_with_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            osrm_url: None,
            ..ServerConfig::default()
        }
        .with_database_path(dir.path().join("nested").join("savaeat.db"));

        let ctx = bootstrap(&config).await.unwrap();
        assert!(ctx.core.directions().is_none());
        assert!(dir.path().join("nested").join("savaeat.db").exists());
    }
}
