use crate::domain::tts::{SynthesisError, VoiceSelection, MAX_TTS_BYTES};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google Cloud TTS, AWS Polly)
///
/// Implementations perform exactly one provider round trip per call and never
/// retry. Splitting, ordering and merging belong to the caller.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize a single chunk of text with the given voice
    ///
    /// Returns MP3 audio for this chunk only
    ///
    /// # Errors
    /// Provider failures are classified as `Unavailable` or `Rejected`
    async fn synthesize_chunk(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<Vec<u8>, SynthesisError>;

    /// Largest UTF-8 input, in bytes, the provider accepts per request
    fn max_request_bytes(&self) -> usize {
        MAX_TTS_BYTES
    }

    fn provider_name(&self) -> &'static str;
}
