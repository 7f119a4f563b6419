use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::TtsService;

/// GET / - Service banner
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Audicle API Server is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(tts_service): State<Arc<TtsService>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts": tts_service.provider_name(),
            "fallback_audio": tts_service.fallback_available().await,
        })),
    )
}
