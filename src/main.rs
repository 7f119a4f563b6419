use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audicle_api::controllers::{extract::ExtractController, tts::TtsController};
use audicle_api::domain::extract::ExtractService;
use audicle_api::domain::tts::{SynthesisError, TtsService, TtsSettings};
use audicle_api::infrastructure::config::{Config, LogFormat, TtsProvider};
use audicle_api::infrastructure::http::start_http_server;
use audicle_api::infrastructure::oauth::GoogleServiceAccountClient;
use audicle_api::infrastructure::repositories::{
    FileFallbackAudioRepository, GoogleTtsRepository, PollyTtsRepository, ReadabilityExtractor,
    TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Audicle API Server on {}:{}",
        config.host,
        config.port
    );

    // Provider client is built once here, before any request is served
    let tts_repo = match create_tts_repository(&config).await {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!(error = %e, provider = ?config.tts_provider, "TTS provider is misconfigured");
            return Err(e.into());
        }
    };
    tracing::info!(
        provider = tts_repo.provider_name(),
        max_request_bytes = tts_repo.max_request_bytes(),
        "TTS provider initialized"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let fallback_repo = Arc::new(FileFallbackAudioRepository::new(
        config.fallback_audio_path.clone(),
    ));
    let extractor = Arc::new(ReadabilityExtractor::new(
        config.extractor_node_bin.clone(),
        config.extractor_script_path.clone(),
        Duration::from_secs(config.extract_timeout_secs),
    ));

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(
        tts_repo,
        fallback_repo,
        TtsSettings::from(config.as_ref()),
    ));
    let extract_service = Arc::new(ExtractService::new(extractor));

    if !tts_service.fallback_available().await {
        tracing::warn!(
            path = %config.fallback_audio_path.display(),
            "Fallback audio file not found; failed syntheses will return empty audio"
        );
    }

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service.clone()));
    let extract_controller = Arc::new(ExtractController::new(extract_service));

    start_http_server(config, tts_service, tts_controller, extract_controller).await?;

    Ok(())
}

async fn create_tts_repository(config: &Config) -> Result<Arc<dyn TtsRepository>, SynthesisError> {
    match config.tts_provider {
        TtsProvider::Google => {
            let credentials_path = config.google_credentials_path.as_ref().ok_or_else(|| {
                SynthesisError::Misconfigured(
                    "GOOGLE_APPLICATION_CREDENTIALS environment variable is not set.".to_string(),
                )
            })?;

            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.tts_request_timeout_secs))
                .build()
                .map_err(|e| {
                    SynthesisError::Misconfigured(format!("Failed to build HTTP client: {}", e))
                })?;

            tracing::info!("Initialising Google Cloud Text-to-Speech client");
            let auth = GoogleServiceAccountClient::from_file(credentials_path, http_client.clone())?;
            tracing::info!(client_email = %auth.client_email(), "Service account credentials loaded");

            Ok(Arc::new(GoogleTtsRepository::new(
                http_client,
                Arc::new(auth),
                config.google_tts_endpoint.clone(),
                config.speaking_rate,
            )))
        }
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;

            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            let polly_client = aws_sdk_polly::Client::new(&aws_config);
            Ok(Arc::new(PollyTtsRepository::new(
                Arc::new(polly_client),
                config.speaking_rate,
            )))
        }
    }
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "audicle_api=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
