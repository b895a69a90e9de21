use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::engines::SynthesisEngine;

/// GET / - Service acknowledgment
pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "message": "Voice design API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(engine): State<Arc<dyn SynthesisEngine>>) -> impl IntoResponse {
    if engine.is_ready().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "engine": engine.name(),
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "engine": engine.name(),
            })),
        )
    }
}
