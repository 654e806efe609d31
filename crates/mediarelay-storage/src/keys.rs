//! Shared key generation for storage backends.

use chrono::Utc;

/// Generate a storage key `{unix_millis}.{extension}` for an object written now.
pub fn generate_storage_key(extension: &str) -> String {
    key_for_millis(Utc::now().timestamp_millis(), extension)
}

fn key_for_millis(millis: i64, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        millis.to_string()
    } else {
        format!("{}.{}", millis, extension)
    }
}
