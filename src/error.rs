use axum::http::StatusCode;

pub type PhotoResult<T> = Result<T, PhotoError>;

/// Failures a photo request can end in. Every variant is terminal for the
/// request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Only image files are allowed: {0}")]
    UnsupportedMediaType(String),

    #[error("No photo was attached to the request")]
    MissingUpload,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Invalid photo id: {0}")]
    InvalidId(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Photo not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Store file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PhotoError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PhotoError::UnsupportedMediaType(_)
            | PhotoError::MissingUpload
            | PhotoError::InvalidUpload(_)
            | PhotoError::InvalidId(_) => StatusCode::BAD_REQUEST,
            PhotoError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            PhotoError::NotFound => StatusCode::NOT_FOUND,
            PhotoError::Storage(_) | PhotoError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show a client when internal details are hidden.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Something went wrong while handling the photo.".to_string()
        } else {
            self.to_string()
        }
    }
}
