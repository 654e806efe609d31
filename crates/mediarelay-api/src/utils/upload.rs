//! Multipart intake for the upload routes

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use mediarelay_core::constants::{LOGGED_IN_USER_FIELD, MIB};
use mediarelay_core::models::normalize_mime_type;
use mediarelay_core::AppError;
use mediarelay_processing::{parse_identity, MediaValidator, ValidationError};

use crate::services::relay::UploadRequest;

/// Read the upload form: exactly one file field named after the media kind
/// plus an optional JSON `loggedInUser` field. Other fields are ignored.
///
/// The declared MIME type is checked before the body of the field is read and
/// the size ceiling is enforced chunk by chunk.
pub async fn read_upload(
    mut multipart: Multipart,
    validator: &MediaValidator,
) -> Result<UploadRequest, AppError> {
    let kind = validator.kind();
    let max = validator.max_file_size();

    let mut file: Option<(bytes::Bytes, String, Option<String>)> = None;
    let mut logged_in_user = None;
    let mut identity_seen = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == kind.field_name() {
            if file.is_some() {
                return Err(ValidationError::DuplicateField(kind.field_name()).into());
            }

            let content_type = field.content_type().unwrap_or_default().to_string();
            validator.validate_content_type(&content_type)?;
            let original_file_name = field.file_name().and_then(sanitize_filename);

            let data = read_field_bounded(field, validator).await?;
            validator.validate_file_size(data.len())?;

            file = Some((data, normalize_mime_type(&content_type), original_file_name));
        } else if field_name == LOGGED_IN_USER_FIELD {
            if identity_seen {
                return Err(ValidationError::DuplicateField(LOGGED_IN_USER_FIELD).into());
            }
            identity_seen = true;

            let text = field.text().await.map_err(|e| multipart_error(e, max))?;
            logged_in_user = parse_identity(&text)?;
        }
    }

    let (data, content_type, original_file_name) =
        file.ok_or(ValidationError::MissingFile(kind.field_name()))?;

    Ok(UploadRequest {
        kind,
        logged_in_user,
        content_type,
        original_file_name,
        data,
    })
}

async fn read_field_bounded(
    mut field: Field<'_>,
    validator: &MediaValidator,
) -> Result<bytes::Bytes, AppError> {
    let max = validator.max_file_size();
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max))? {
        validator.check_received(buffer.len() + chunk.len())?;
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}

/// Map a multipart stream error. The body-limit layer surfaces as 413.
fn multipart_error(err: MultipartError, max: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "File exceeds the maximum allowed size of {} MB",
            max / MIB
        ));
    }
    ValidationError::MalformedBody(err.body_text()).into()
}

/// Reduce a client-supplied filename to a safe base name.
///
/// Directory components are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. Returns `None` when nothing usable remains.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.replace("..", "_");

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        None
    } else {
        Some(sanitized)
    }
}
