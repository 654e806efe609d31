//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mediarelay_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediarelay API",
        description = "Media ingestion relay: accepts video and audio uploads, transcodes them, stores them in object storage and notifies a workflow trigger."
    ),
    paths(
        handlers::upload::upload_video,
        handlers::upload::upload_audio,
        handlers::passthrough::forward_document,
        handlers::health::health_check,
    ),
    components(schemas(
        error::ErrorResponse,
        models::PassthroughResponse,
        models::NotificationPayload,
        models::MediaKind,
        handlers::health::HealthResponse,
        handlers::health::TranscodeStatus,
    )),
    tags(
        (name = "uploads", description = "Media upload relay"),
        (name = "legacy", description = "Legacy JSON passthrough"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
