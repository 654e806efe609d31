use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Kind of media accepted by an upload route.
///
/// Serializes as `"Video"` / `"Audio"`, the label the workflow trigger expects
/// in `fileType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// MIME prefix every upload of this kind must carry.
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Video => "video/",
            MediaKind::Audio => "audio/",
        }
    }

    /// Multipart field name holding the binary payload.
    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Key under which the storage URL is returned to the caller.
    pub fn url_key(self) -> &'static str {
        match self {
            MediaKind::Video => "videoUrl",
            MediaKind::Audio => "audioUrl",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.field_name()
    }

    /// Whether `content_type` belongs to this kind. Comparison is
    /// case-insensitive and ignores MIME parameters.
    pub fn accepts(self, content_type: &str) -> bool {
        normalize_mime_type(content_type).starts_with(self.mime_prefix())
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Strip MIME parameters and lower-case the essence
/// (`"Video/WebM;codecs=vp8"` -> `"video/webm"`).
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// File extension for a MIME type, used when no transcoding happens.
pub fn extension_for_mime(content_type: &str) -> String {
    let normalized = normalize_mime_type(content_type);
    let known = match normalized.as_str() {
        "video/mp4" => Some("mp4"),
        "video/webm" | "audio/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        "video/x-msvideo" => Some("avi"),
        "video/x-matroska" => Some("mkv"),
        "video/ogg" | "audio/ogg" | "application/ogg" => Some("ogg"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" | "audio/x-m4a" => Some("m4a"),
        "audio/wav" | "audio/wave" | "audio/x-wav" => Some("wav"),
        "audio/flac" => Some("flac"),
        "audio/aac" => Some("aac"),
        _ => None,
    };

    if let Some(ext) = known {
        return ext.to_string();
    }

    // Fall back to the subtype, minus any "x-" vendor prefix.
    let subtype = normalized
        .split('/')
        .nth(1)
        .map(|s| s.trim_start_matches("x-"))
        .unwrap_or("");
    let cleaned: String = subtype
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}
