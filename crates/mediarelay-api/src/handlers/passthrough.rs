use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mediarelay_core::models::PassthroughResponse;
use serde_json::Value as JsonValue;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Legacy route: forwards an arbitrary JSON document to the passthrough
/// webhook and echoes its response.
#[utoipa::path(
    post,
    path = "/upload-to-airtable",
    tag = "legacy",
    request_body(content = inline(Object), content_type = "application/json"),
    responses(
        (status = 200, description = "Document forwarded", body = PassthroughResponse),
        (status = 400, description = "Invalid JSON body", body = ErrorResponse),
        (status = 500, description = "Downstream webhook failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, document), fields(operation = "passthrough"))]
pub async fn forward_document(
    State(state): State<Arc<AppState>>,
    ValidatedJson(document): ValidatedJson<JsonValue>,
) -> Result<Json<PassthroughResponse>, HttpAppError> {
    let data = state.passthrough.forward(&document).await?;

    Ok(Json(PassthroughResponse {
        success: true,
        message: "Data forwarded successfully".to_string(),
        data,
    }))
}
