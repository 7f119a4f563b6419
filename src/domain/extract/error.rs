use crate::error::AppError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("Extraction failed: {0}")]
    Failed(String),
    #[error("Extraction timeout after {0:?}")]
    Timeout(Duration),
    #[error("Failed to parse extraction result: {0}")]
    Malformed(String),
    #[error("Failed to run extractor: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidUrl(msg) => AppError::BadRequest(msg),
            err @ ExtractionError::Failed(_) => AppError::BadRequest(err.to_string()),
            err @ ExtractionError::Timeout(_) => AppError::RequestTimeout(err.to_string()),
            err => AppError::Internal(err.to_string()),
        }
    }
}
