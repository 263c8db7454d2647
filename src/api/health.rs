use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Health response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let database_status = match state.users.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "error",
        Err(_) => "disconnected",
    };

    let overall_status = if database_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Ok(Json(HealthResponse {
        status: overall_status.to_string(),
        database: database_status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}
