use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mediarelay_core::MediaKind;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscodeStatus {
    pub video: bool,
    pub audio: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage_backend: String,
    pub transcode: TranscodeStatus,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_backend: state.storage.backend_type().to_string(),
        transcode: TranscodeStatus {
            video: state.config.transcode_enabled_for(MediaKind::Video),
            audio: state.config.transcode_enabled_for(MediaKind::Audio),
        },
    })
}
