use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use super::media::MediaKind;

/// Body posted to the workflow-trigger endpoint once an upload is stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub file_url: String,
    /// Storage key of the object, e.g. `1718000000000.mp4`.
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    /// Caller identity, forwarded as received.
    #[schema(value_type = Object)]
    pub logged_in_user: Option<JsonValue>,
    pub file_type: MediaKind,
    pub content_type: String,
    pub file_size: u64,
    pub timestamp: DateTime<Utc>,
}
