//! Shared constants

/// Bytes in one mebibyte.
pub const MIB: usize = 1024 * 1024;

/// Default ceiling for video uploads (5 GiB).
pub const DEFAULT_MAX_VIDEO_SIZE_MB: usize = 5 * 1024;

/// Default ceiling for audio uploads (100 MiB).
pub const DEFAULT_MAX_AUDIO_SIZE_MB: usize = 100;

/// Multipart form field carrying the caller identity.
pub const LOGGED_IN_USER_FIELD: &str = "loggedInUser";

/// Prefix used for every temporary file or directory the relay creates.
pub const TEMP_PREFIX: &str = "relay";
