pub mod errors;
pub mod models;
pub mod routes;
pub mod tools;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ScannerConfig;
use crate::scanner::SmugglerTool;

#[derive(Clone)]
pub struct AppState {
    pub tool: Arc<SmugglerTool>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Arc<ScannerConfig>) -> Self {
        Self {
            tool: Arc::new(SmugglerTool::new(config)),
            started_at: Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/mcp", post(routes::mcp::handle_mcp))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
