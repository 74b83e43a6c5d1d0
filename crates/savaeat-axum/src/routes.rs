//! Route definitions and router construction.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// All API routes, without the `/api` prefix and without state applied.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Vendors
        .route("/vendors", get(handlers::vendors::nearby))
        .route(
            "/vendors/{id}",
            get(handlers::vendors::get).put(handlers::vendors::update),
        )
        .route(
            "/vendors/{id}/reviews",
            get(handlers::vendors::reviews).post(handlers::vendors::add_review),
        )
        .route(
            "/vendors/{id}/reviews/{review_id}",
            put(handlers::vendors::update_review).delete(handlers::vendors::delete_review),
        )
        .route(
            "/vendors/{id}/with-reviews",
            get(handlers::vendors::with_reviews),
        )
        .route("/vendors/{id}/like", post(handlers::vendors::toggle_like))
        .route(
            "/vendors/{id}/aggregate/recompute",
            post(handlers::vendors::recompute_aggregate),
        )
        // Clients
        .route(
            "/clients/{id}",
            get(handlers::clients::get).put(handlers::clients::update),
        )
        // Signed-in caller
        .route("/me", get(handlers::me::current))
        .route("/me/favorites", get(handlers::me::favorites))
        // Accounts
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // Directions
        .route("/directions", get(handlers::directions::route))
        // Maintenance
        .route(
            "/maintenance/repair-likes",
            post(handlers::maintenance::repair_likes),
        )
        // Settings
        .route(
            "/settings",
            get(handlers::settings::get)
                .put(handlers::settings::update)
                .patch(handlers::settings::update),
        )
        // Events (SSE)
        .route("/events", get(handlers::events::stream))
}

/// Create the API router (`/health` and `/api/*`).
///
/// Axum 0.8 path parameters use brace syntax: `{id}`.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state).layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// API routes plus the built web app, with `index.html` as the fallback for
/// client-side routes.
///
/// ```ignore
/// let router = create_spa_router(ctx, "./web/dist", &CorsConfig::AllowAll);
/// ```
pub fn create_spa_router<P: AsRef<Path>>(
    ctx: AxumContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    let static_path = static_dir.as_ref();
    let index_path = static_path.join("index.html");
    let serve_dir = ServeDir::new(static_path).fallback(ServeFile::new(&index_path));

    create_router(ctx, cors_config).fallback_service(serve_dir)
}

pub(crate) async fn health_check() -> &'static str {
    "OK"
}
