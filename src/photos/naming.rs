use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const SUFFIX_LEN: usize = 8;

pub fn extension_for_mime_type(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    match essence.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        _ => "bin",
    }
}

/// Builds the on-disk name for an upload: `{epoch millis}-{hash}.{ext}`.
///
/// The hash covers the nanosecond timestamp and the original name, so two
/// uploads landing in the same millisecond still get different names unless
/// they also share a nanosecond and a filename.
pub fn storage_filename(mime_type: &str, original_name: &str, now: DateTime<Utc>) -> String {
    let ext = extension_for_mime_type(mime_type);
    let nanos = now.timestamp_nanos_opt().unwrap_or_default();
    let suffix = short_hash(&format!("upload:{nanos}:{original_name}"));
    format!("{}-{suffix}.{ext}", now.timestamp_millis())
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(SUFFIX_LEN);
    encoded
}
