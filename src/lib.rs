//! Xavia OTA Backend
//!
//! Over-the-air update distribution: manifest resolution, signed bundle
//! downloads, release rollback, and download metrics behind a REST API.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod resolver;
pub mod storage;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use resolver::Resolver;
use storage::LocalArtifactStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub resolver: Arc<Resolver>,
    pub artifacts: Arc<LocalArtifactStore>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the admin secret for the auth layer
    let admin_secret = state.config.admin_password.clone();

    // Dashboard-facing routes behind the shared-secret check
    let admin_routes = Router::new()
        .route("/releases", get(api::list_releases))
        .route("/rollback", post(api::rollback))
        .route("/tracking/all", get(api::all_tracking))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(admin_secret.clone(), req, next)
        }));

    // Device-facing routes: manifest resolution and signed downloads
    let device_routes = Router::new()
        .route("/manifest", post(api::post_manifest))
        .route("/bundles/{*path}", get(api::download_bundle))
        .route("/login", post(api::login));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", device_routes.merge(admin_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
