use crate::error::AppError;

/// Failure of a single provider round trip
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// Network, quota, timeout or internal provider failure
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    /// The provider refused this input or voice
    #[error("provider rejected request: {0}")]
    Rejected(String),
    /// Credentials missing or invalid
    #[error("provider misconfigured: {0}")]
    Misconfigured(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("text too large: {0}")]
    PayloadTooLarge(String),
    #[error("Synthesis failed: {synthesis}. Fallback failed: {fallback}")]
    FallbackFailed {
        synthesis: SynthesisError,
        fallback: String,
    },
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            err @ TtsServiceError::FallbackFailed { .. } => AppError::Internal(err.to_string()),
        }
    }
}
