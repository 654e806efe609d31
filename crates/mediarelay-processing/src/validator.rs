use mediarelay_core::constants::MIB;
use mediarelay_core::models::normalize_mime_type;
use mediarelay_core::{AppError, MediaKind};
use serde_json::Value as JsonValue;

/// Client-side faults detected while taking in an upload
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (expected {expected}*)")]
    InvalidContentType {
        content_type: String,
        expected: &'static str,
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("Missing file field '{0}'")]
    MissingFile(&'static str),

    #[error("Field '{0}' must appear only once")]
    DuplicateField(&'static str),

    #[error("Invalid loggedInUser: {0}")]
    InvalidIdentity(String),

    #[error("Malformed multipart body: {0}")]
    MalformedBody(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { max, .. } => AppError::PayloadTooLarge(format!(
                "File exceeds the maximum allowed size of {} MB",
                max / MIB
            )),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

/// Per-kind upload validator
///
/// Checks are split so the intake can enforce the ceiling while the body is
/// still streaming, before the whole file is buffered.
pub struct MediaValidator {
    kind: MediaKind,
    max_file_size: usize,
}

impl MediaValidator {
    pub fn new(kind: MediaKind, max_file_size: usize) -> Self {
        Self {
            kind,
            max_file_size,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate the declared MIME type against the kind prefix
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if !self.kind.accepts(content_type) {
            return Err(ValidationError::InvalidContentType {
                content_type: normalize_mime_type(content_type),
                expected: self.kind.mime_prefix(),
            });
        }
        Ok(())
    }

    /// Check a running byte count against the ceiling
    pub fn check_received(&self, received: usize) -> Result<(), ValidationError> {
        if received > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size: received,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate the final file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        self.check_received(size)
    }
}

/// Parse the `loggedInUser` form field. Blank input counts as absent.
pub fn parse_identity(raw: &str) -> Result<Option<JsonValue>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| ValidationError::InvalidIdentity(e.to_string()))
}
