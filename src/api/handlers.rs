//! API Handlers
//!
//! HTTP request handlers for each operational endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::models::{HealthResponse, StatsResponse};
use crate::readthrough::ReadThrough;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through helper, also driven by the refresher
    pub read_through: Arc<ReadThrough>,
}

impl AppState {
    /// Creates a new AppState around a shared read-through helper.
    pub fn new(read_through: Arc<ReadThrough>) -> Self {
        Self { read_through }
    }
}

/// Handler for GET /stats
///
/// Returns current read-through statistics and the active backend.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let backend = state.read_through.cache().backend_name();
    Json(StatsResponse::new(backend, state.read_through.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
