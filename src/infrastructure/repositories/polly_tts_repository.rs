use super::tts_repository::TtsRepository;
use crate::domain::tts::{is_voice_neural_compatible, SynthesisError, VoiceSelection};
use async_trait::async_trait;
use aws_sdk_polly::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::synthesize_speech::SynthesizeSpeechError,
    types::{Engine, LanguageCode, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 billed characters per request
const MAX_REQUEST_BYTES: usize = 3000;
/// Total SSML input, tags and entities included, is capped at 6000 characters
const MAX_SSML_CHARS: usize = 6000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    speaking_rate: f32,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, speaking_rate: f32) -> Self {
        Self {
            polly_client,
            speaking_rate,
        }
    }

    /// Request input for a chunk.
    ///
    /// SSML carries the speaking rate, but escaping can grow markup-heavy
    /// text past Polly's total input limit. Such chunks are sent as plain
    /// text, which fits because the chunk is within the billed budget.
    fn request_input(&self, text: &str) -> (String, TextType) {
        let ssml = self.to_ssml(text);
        if ssml.chars().count() <= MAX_SSML_CHARS {
            return (ssml, TextType::Ssml);
        }

        tracing::warn!(
            text_length = text.len(),
            ssml_length = ssml.len(),
            "SSML exceeds Polly input limit, sending plain text without speaking rate"
        );
        (text.to_string(), TextType::Text)
    }

    /// Wrap text in SSML so the speaking rate applies
    fn to_ssml(&self, text: &str) -> String {
        let rate_percent = (self.speaking_rate * 100.0).round() as u32;
        format!(
            r#"<speak><prosody rate="{}%">{}</prosody></speak>"#,
            rate_percent,
            escape_xml(text)
        )
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize_chunk(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<Vec<u8>, SynthesisError> {
        let voice_id = VoiceId::from(voice.name.as_str());
        let engine = if is_voice_neural_compatible(&voice.name) {
            Engine::Neural
        } else {
            Engine::Standard
        };

        tracing::info!(
            language = %voice.language_code,
            voice = %voice.name,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let (input, text_type) = self.request_input(text);

        let result = self
            .polly_client
            .synthesize_speech()
            .text(input)
            .text_type(text_type)
            .voice_id(voice_id)
            .language_code(LanguageCode::from(voice.language_code.as_str()))
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    language = %voice.language_code,
                    voice = %voice.name,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                classify_error(e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SynthesisError::Unavailable(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }

    fn max_request_bytes(&self) -> usize {
        MAX_REQUEST_BYTES
    }

    fn provider_name(&self) -> &'static str {
        "polly"
    }
}

/// Unmodeled code Polly returns for an unknown voice or bad parameter
const VALIDATION_ERROR_CODE: &str = "ValidationException";

/// Input-specific Polly faults are rejections; everything else is transient
fn classify_error<R: std::fmt::Debug>(err: SdkError<SynthesizeSpeechError, R>) -> SynthesisError {
    let message = format!("AWS Polly error: {}", DisplayErrorContext(&err));

    match err.as_service_error() {
        Some(service_error) if service_error.code() == Some(VALIDATION_ERROR_CODE) => {
            SynthesisError::Rejected(message)
        }
        Some(service_error)
            if service_error.is_text_length_exceeded_exception()
                || service_error.is_invalid_ssml_exception()
                || service_error.is_language_not_supported_exception()
                || service_error.is_engine_not_supported_exception()
                || service_error.is_lexicon_not_found_exception()
                || service_error.is_invalid_sample_rate_exception()
                || service_error.is_marks_not_supported_for_format_exception()
                || service_error.is_ssml_marks_not_supported_for_text_type_exception() =>
        {
            SynthesisError::Rejected(message)
        }
        _ => SynthesisError::Unavailable(message),
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
