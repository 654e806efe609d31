//! HTTP-level constants

use mediarelay_core::constants::MIB;

pub const UPLOAD_VIDEO_PATH: &str = "/upload-video";
pub const UPLOAD_AUDIO_PATH: &str = "/upload-audio";
pub const PASSTHROUGH_PATH: &str = "/upload-to-airtable";
pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Slack added to a media ceiling for multipart boundaries and small fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = MIB;

/// Body limit of the JSON passthrough route.
pub const PASSTHROUGH_BODY_LIMIT_BYTES: usize = 10 * MIB;
