use crate::error::{PhotoError, PhotoResult};

/// Suffixes accepted for uploads. Matching is case-sensitive.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub fn check_image_filename(original_name: &str) -> PhotoResult<()> {
    let accepted = original_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext));
    if accepted {
        Ok(())
    } else {
        Err(PhotoError::UnsupportedMediaType(original_name.to_string()))
    }
}
