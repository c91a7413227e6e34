//! Rephrase dev server
//!
//! Serves the web app and a fixture backend that honours the same wire
//! contract as the production service:
//! - `POST /api/process` with deterministic stand-in results
//! - `GET /ws` live usage counters, sent on connect and on every tick
//! - `GET /health`

pub mod config;
pub mod error;
pub mod fixtures;
pub mod process;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use stats::StatsTracker;

#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<StatsTracker>,
    pub word_limit: usize,
}

impl AppState {
    pub fn new(word_limit: usize) -> Self {
        Self {
            stats: Arc::new(StatsTracker::new()),
            word_limit,
        }
    }
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Build the router. Static files are served from `static_dir` when given.
pub fn build_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/process", post(process::process))
        .route("/ws", get(stats::ws_handler));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
