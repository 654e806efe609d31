use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use mediarelay_core::models::UploadResponse;
use mediarelay_core::MediaKind;
use mediarelay_processing::MediaValidator;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::relay::{RelayOrchestrator, RelayStage, StageTracker};
use crate::state::AppState;
use crate::utils::upload::read_upload;

#[utoipa::path(
    post,
    path = "/upload-video",
    tag = "uploads",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "Field `video` (video/*) and optional `loggedInUser` (JSON string)"
    ),
    responses(
        (status = 200, description = "Video stored and workflow triggered: {success, videoUrl, data}", body = serde_json::Value),
        (status = 400, description = "Malformed form, missing file, wrong MIME type or invalid loggedInUser", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Transcode, storage or notification failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    handle_upload(state, MediaKind::Video, multipart).await
}

#[utoipa::path(
    post,
    path = "/upload-audio",
    tag = "uploads",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "Field `audio` (audio/*) and optional `loggedInUser` (JSON string)"
    ),
    responses(
        (status = 200, description = "Audio stored and workflow triggered: {success, audioUrl, data}", body = serde_json::Value),
        (status = 400, description = "Malformed form, missing file, wrong MIME type or invalid loggedInUser", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Transcode, storage or notification failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_audio"))]
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    handle_upload(state, MediaKind::Audio, multipart).await
}

async fn handle_upload(
    state: Arc<AppState>,
    kind: MediaKind,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut tracker = StageTracker::received();
    let validator = MediaValidator::new(kind, state.config.max_size_for(kind));

    let intake = match multipart {
        Ok(multipart) => read_upload(multipart, &validator).await,
        Err(rejection) => Err(HttpAppError::from(rejection).0),
    };
    let request = match intake {
        Ok(request) => request,
        Err(e) => {
            tracker.fail(&e);
            return Err(e.into());
        }
    };
    tracker.advance(RelayStage::Validated);
    tracing::info!(
        kind = %kind,
        content_type = %request.content_type,
        size_bytes = request.size(),
        identity = request.logged_in_user.is_some(),
        "Upload received"
    );

    let outcome = RelayOrchestrator::from_state(&state).spawn(request, tracker).await?;

    Ok(Json(UploadResponse::new(
        outcome.kind,
        outcome.url,
        outcome.data,
    )))
}
