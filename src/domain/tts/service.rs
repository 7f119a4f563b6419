use super::error::{SynthesisError, TtsServiceError};
use super::segmenter::split_text;
use super::voice::VoiceSelection;
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{FallbackAudioRepository, TtsRepository};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which fallback payload was served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAsset {
    Recorded,
    Empty,
}

/// Degraded response carrying the synthesis failure that caused it
#[derive(Debug, Clone)]
pub struct FallbackResult {
    pub audio_data: Vec<u8>,
    pub asset: FallbackAsset,
    pub cause: SynthesisError,
}

#[derive(Debug, Clone)]
pub enum SynthesisResult {
    Assembled {
        audio_data: Vec<u8>,
        chunk_count: usize,
    },
    Fallback(FallbackResult),
}

impl SynthesisResult {
    pub fn audio_data(&self) -> &[u8] {
        match self {
            SynthesisResult::Assembled { audio_data, .. } => audio_data,
            SynthesisResult::Fallback(fallback) => &fallback.audio_data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SynthesisResult::Fallback(_))
    }
}

#[derive(Debug, Clone)]
pub struct TtsSettings {
    pub default_voice: String,
    pub default_language_code: String,
    pub request_timeout: Duration,
    pub max_concurrency: usize,
    pub max_text_bytes: usize,
}

impl From<&Config> for TtsSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_voice: config.default_voice.clone(),
            default_language_code: config.default_language_code.clone(),
            request_timeout: Duration::from_secs(config.tts_request_timeout_secs),
            max_concurrency: config.tts_max_concurrency.max(1),
            max_text_bytes: config.max_text_bytes,
        }
    }
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    fallback_repo: Arc<dyn FallbackAudioRepository>,
    settings: TtsSettings,
}

impl TtsService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        fallback_repo: Arc<dyn FallbackAudioRepository>,
        settings: TtsSettings,
    ) -> Self {
        Self {
            tts_repo,
            fallback_repo,
            settings,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.tts_repo.provider_name()
    }

    pub async fn fallback_available(&self) -> bool {
        self.fallback_repo.is_available().await
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text to speech
    ///
    /// This operation:
    /// - Splits the text into chunks that fit the provider's request limit
    /// - Synthesizes every chunk with the same voice, keeping chunk order
    /// - Concatenates the chunk audio into one MP3 payload
    ///
    /// Any chunk failure discards the audio gathered so far and returns the
    /// fallback asset instead. Only a failure to load that asset is an error.
    async fn synthesize(
        &self,
        text: String,
        voice: Option<String>,
    ) -> Result<SynthesisResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        text: String,
        voice: Option<String>,
    ) -> Result<SynthesisResult, TtsServiceError> {
        if text.len() > self.settings.max_text_bytes {
            return Err(TtsServiceError::PayloadTooLarge(format!(
                "Text must be {} bytes or less",
                self.settings.max_text_bytes
            )));
        }

        let voice_name = voice
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_voice.clone());
        let voice = VoiceSelection::from_name(&voice_name, &self.settings.default_language_code);

        tracing::info!(
            text_length = text.len(),
            text_preview = preview(&text, 100),
            voice = %voice,
            provider = self.tts_repo.provider_name(),
            "TTS synthesis request"
        );

        match self.synthesize_chunks(&text, &voice).await {
            Ok((audio_data, chunk_count)) => Ok(SynthesisResult::Assembled {
                audio_data,
                chunk_count,
            }),
            Err(cause) => {
                tracing::error!(error = %cause, voice = %voice, "Synthesis error");
                self.fallback(cause).await.map(SynthesisResult::Fallback)
            }
        }
    }
}

impl TtsService {
    /// Synthesize every chunk and merge the audio results in order
    async fn synthesize_chunks(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<(Vec<u8>, usize), SynthesisError> {
        let start_time = Instant::now();

        let chunks = split_text(text, self.tts_repo.max_request_bytes());
        let chunk_count = chunks.len();
        tracing::info!(
            chunk_count = chunk_count,
            text_length = text.len(),
            max_request_bytes = self.tts_repo.max_request_bytes(),
            "Text split into chunks"
        );

        // `buffered` yields in submission order; the first error drops the
        // remaining in-flight calls
        let segments: Vec<Vec<u8>> = stream::iter(0..chunk_count)
            .map(|index| self.synthesize_one(index, chunk_count, chunks[index], voice))
            .buffered(self.settings.max_concurrency)
            .try_collect()
            .await?;

        let audio_data = segments.concat();

        let duration = start_time.elapsed();
        tracing::info!(
            provider = self.tts_repo.provider_name(),
            latency_ms = duration.as_millis(),
            chunk_count = chunk_count,
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok((audio_data, chunk_count))
    }

    async fn synthesize_one(
        &self,
        index: usize,
        chunk_count: usize,
        chunk: &str,
        voice: &VoiceSelection,
    ) -> Result<Vec<u8>, SynthesisError> {
        tracing::info!(
            chunk_index = index + 1,
            chunk_count = chunk_count,
            chunk_bytes = chunk.len(),
            "Synthesizing chunk"
        );

        let timeout = self.settings.request_timeout;
        let audio = tokio::time::timeout(timeout, self.tts_repo.synthesize_chunk(chunk, voice))
            .await
            .map_err(|_| {
                SynthesisError::Unavailable(format!(
                    "chunk {}/{} timed out after {:?}",
                    index + 1,
                    chunk_count,
                    timeout
                ))
            })??;

        tracing::debug!(
            chunk_index = index + 1,
            audio_size = audio.len(),
            "Chunk synthesized"
        );

        Ok(audio)
    }

    async fn fallback(&self, cause: SynthesisError) -> Result<FallbackResult, TtsServiceError> {
        tracing::info!("Attempting fallback: returning pre-recorded audio");

        match self.fallback_repo.load().await {
            Ok(Some(audio_data)) => Ok(FallbackResult {
                audio_data,
                asset: FallbackAsset::Recorded,
                cause,
            }),
            Ok(None) => {
                tracing::warn!("Fallback audio file not found, returning empty response");
                Ok(FallbackResult {
                    audio_data: Vec::new(),
                    asset: FallbackAsset::Empty,
                    cause,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, synthesis_error = %cause, "Fallback also failed");
                Err(TtsServiceError::FallbackFailed {
                    synthesis: cause,
                    fallback: e.to_string(),
                })
            }
        }
    }
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
