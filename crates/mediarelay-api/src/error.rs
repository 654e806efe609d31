//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Stage errors convert into
//! `AppError` first, so every failure renders through the same body, status
//! and logging path.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use mediarelay_core::{AppError, ErrorMetadata, LogLevel};
use mediarelay_infra::NotificationError;
use mediarelay_processing::{TranscodeError, ValidationError};
use mediarelay_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

/// Error body shared by every route: `{success: false, error, code, details?}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from mediarelay-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<TranscodeError> for HttpAppError {
    fn from(err: TranscodeError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<NotificationError> for HttpAppError {
    fn from(err: NotificationError) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body rejections into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        )))
    }
}

/// A request that is not `multipart/form-data` at all is malformed input.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(ValidationError::MalformedBody(rejection.body_text()).into())
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on
/// any rejection, including a missing or wrong `Content-Type`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Build the response body for an error. Details are only exposed outside
/// production and only for non-sensitive errors.
pub fn error_body(app_error: &AppError, is_production: bool) -> ErrorResponse {
    let mut body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
    if !is_production && !app_error.is_sensitive() {
        body.details = Some(app_error.detailed_message());
    }
    body
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut response = (status, Json(error_body(app_error, true))).into_response();
        if !app_error.is_sensitive() {
            response
                .extensions_mut()
                .insert(DetailedErrorBody(error_body(app_error, false)));
        }
        response
    }
}

/// Error body with details, carried on the response until
/// `expose_error_details` decides whether the client may see it.
#[derive(Debug, Clone)]
struct DetailedErrorBody(ErrorResponse);

/// Swap error bodies for their detailed form. Installed by the router
/// outside production only.
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let Some(DetailedErrorBody(body)) = response.extensions_mut().remove::<DetailedErrorBody>()
    else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Json(body).into_response().into_body())
}
