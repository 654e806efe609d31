use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use super::media::MediaKind;

/// Success body of the upload routes: `{success, videoUrl|audioUrl, data}`.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub kind: MediaKind,
    pub url: String,
    /// Workflow-trigger response body, passed through verbatim.
    pub data: JsonValue,
}

impl UploadResponse {
    pub fn new(kind: MediaKind, url: String, data: JsonValue) -> Self {
        Self { kind, url, data }
    }
}

impl Serialize for UploadResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("success", &true)?;
        map.serialize_entry(self.kind.url_key(), &self.url)?;
        map.serialize_entry("data", &self.data)?;
        map.end()
    }
}

/// Success body of the legacy passthrough route.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PassthroughResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: JsonValue,
}
