//! Data models for the relay
//!
//! Each sub-module covers one stage of the pipeline: what the caller uploads,
//! what the workflow trigger receives, and what the caller gets back.

mod media;
mod notification;
mod relay;

pub use media::{extension_for_mime, normalize_mime_type, MediaKind};
pub use notification::NotificationPayload;
pub use relay::{PassthroughResponse, UploadResponse};
