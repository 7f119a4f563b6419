use super::tts_repository::TtsRepository;
use crate::domain::tts::{SynthesisError, VoiceSelection};
use crate::infrastructure::oauth::GoogleServiceAccountClient;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeSpeechRequest<'a> {
    pub input: SynthesisInput<'a>,
    pub voice: VoiceSelectionParams<'a>,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub struct SynthesisInput<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams<'a> {
    pub language_code: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: &'static str,
    pub speaking_rate: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech implementation of TTS repository
pub struct GoogleTtsRepository {
    http_client: reqwest::Client,
    auth: Arc<GoogleServiceAccountClient>,
    endpoint: String,
    speaking_rate: f32,
}

impl GoogleTtsRepository {
    pub fn new(
        http_client: reqwest::Client,
        auth: Arc<GoogleServiceAccountClient>,
        endpoint: String,
        speaking_rate: f32,
    ) -> Self {
        Self {
            http_client,
            auth,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            speaking_rate,
        }
    }

    fn synthesize_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.endpoint)
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize_chunk(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<Vec<u8>, SynthesisError> {
        let access_token = self.auth.access_token().await?;

        let request = SynthesizeSpeechRequest {
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code: &voice.language_code,
                name: &voice.name,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: self.speaking_rate,
            },
        };

        tracing::info!(
            voice = %voice.name,
            language = %voice.language_code,
            speaking_rate = self.speaking_rate,
            text_length = text.len(),
            "Calling Google Cloud TTS text:synthesize"
        );

        let response = self
            .http_client
            .post(self.synthesize_url())
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = %voice.name, "Google Cloud TTS request failed");
                SynthesisError::Unavailable(format!("Google Cloud TTS error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                error = %error_text,
                voice = %voice.name,
                text_length = text.len(),
                "Google Cloud TTS synthesize failed"
            );
            // A revoked or expired token must not be reused until its cached expiry
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                self.auth.invalidate_token().await;
            }
            return Err(classify_status(status, &error_text));
        }

        let body = response.json::<SynthesizeSpeechResponse>().await.map_err(|e| {
            SynthesisError::Unavailable(format!("Failed to parse Google Cloud TTS response: {}", e))
        })?;

        let audio_bytes = STANDARD.decode(body.audio_content).map_err(|e| {
            SynthesisError::Unavailable(format!("Invalid audio content from Google Cloud TTS: {}", e))
        })?;

        tracing::debug!(audio_size = audio_bytes.len(), "Google Cloud TTS audio received");

        Ok(audio_bytes)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

/// Map a Google API error status onto the synthesis error taxonomy
pub fn classify_status(status: StatusCode, body: &str) -> SynthesisError {
    let message = format!("Google Cloud TTS error ({}): {}", status, body);
    match status {
        StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => SynthesisError::Unavailable(message),
        s if s.is_client_error() => SynthesisError::Rejected(message),
        _ => SynthesisError::Unavailable(message),
    }
}
