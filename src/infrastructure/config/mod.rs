use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Speech provider
    pub tts_provider: TtsProvider,
    pub google_credentials_path: Option<PathBuf>,
    pub google_tts_endpoint: String,
    pub aws_region: String,
    // Synthesis pipeline
    pub default_voice: String,
    pub default_language_code: String,
    pub speaking_rate: f32,
    pub tts_request_timeout_secs: u64,
    pub tts_max_concurrency: usize,
    pub max_text_bytes: usize,
    pub fallback_audio_path: PathBuf,
    // Content extraction subprocess
    pub extractor_node_bin: String,
    pub extractor_script_path: PathBuf,
    pub extract_timeout_secs: u64,
    // CORS
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Google,
    Polly,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "google".to_string())
                .to_lowercase()
                .as_str()
            {
                "google" => TtsProvider::Google,
                "polly" => TtsProvider::Polly,
                other => return Err(format!("Unknown TTS_PROVIDER '{}'", other).into()),
            },
            google_credentials_path: env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            google_tts_endpoint: env::var("GOOGLE_TTS_ENDPOINT")
                .unwrap_or_else(|_| "https://texttospeech.googleapis.com".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "ap-northeast-1".to_string()),
            default_voice: env::var("DEFAULT_VOICE")
                .unwrap_or_else(|_| "ja-JP-Neural2-B".to_string()),
            default_language_code: env::var("DEFAULT_LANGUAGE_CODE")
                .unwrap_or_else(|_| "ja-JP".to_string()),
            speaking_rate: env::var("TTS_SPEAKING_RATE")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse()?,
            tts_request_timeout_secs: env::var("TTS_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            tts_max_concurrency: env::var("TTS_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "1".to_string())
                .parse::<usize>()?
                .max(1),
            max_text_bytes: env::var("MAX_TEXT_BYTES")
                .unwrap_or_else(|_| "100000".to_string())
                .parse()?,
            fallback_audio_path: env::var("FALLBACK_AUDIO_PATH")
                .unwrap_or_else(|_| "fallback.mp3".to_string())
                .into(),
            extractor_node_bin: env::var("EXTRACTOR_NODE_BIN")
                .unwrap_or_else(|_| "node".to_string()),
            extractor_script_path: env::var("EXTRACTOR_SCRIPT_PATH")
                .unwrap_or_else(|_| "readability_script.js".to_string())
                .into(),
            extract_timeout_secs: env::var("EXTRACT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string()),
            ),
        };

        Ok(config)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
