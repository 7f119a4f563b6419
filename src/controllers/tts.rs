use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{FallbackAsset, SynthesisResult, SynthesizeRequest, TtsService, TtsServiceApi},
    error::{AppError, AppResult},
};

pub const X_FALLBACK: &str = "x-fallback";
pub const X_ERROR: &str = "x-error";
pub const X_CHUNK_COUNT: &str = "x-chunk-count";

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /synthesize - Convert text to speech
    ///
    /// Degraded responses keep status 200 and are marked by `X-Fallback` and
    /// `X-Error` headers.
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<SynthesizeRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let result = controller
            .tts_service
            .synthesize(request.text, request.voice)
            .await
            .map_err(AppError::from)?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));

        let audio_data = match result {
            SynthesisResult::Assembled {
                audio_data,
                chunk_count,
            } => {
                headers.insert(
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static("attachment; filename=speech.mp3"),
                );
                headers.insert(X_CHUNK_COUNT, HeaderValue::from(chunk_count));
                audio_data
            }
            SynthesisResult::Fallback(fallback) => {
                let disposition = match fallback.asset {
                    FallbackAsset::Recorded => "attachment; filename=fallback.mp3",
                    FallbackAsset::Empty => "attachment; filename=empty.mp3",
                };
                headers.insert(
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(disposition),
                );
                headers.insert(X_FALLBACK, HeaderValue::from_static("true"));
                headers.insert(X_ERROR, error_header(&fallback.cause.to_string()));
                fallback.audio_data
            }
        };

        Ok((StatusCode::OK, headers, Body::from(audio_data)))
    }
}

/// Header values must be visible ASCII; anything else is replaced
fn error_header(message: &str) -> HeaderValue {
    let sanitized: String = message
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect();

    HeaderValue::from_str(&sanitized).unwrap_or_else(|_| HeaderValue::from_static("synthesis failed"))
}
