pub mod request_id;

use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{
    extract::ExtractController,
    health,
    tts::{TtsController, X_ERROR, X_FALLBACK},
};
use crate::domain::tts::TtsService;
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Build the application router with all routes and middleware
pub fn create_router(
    config: &Config,
    tts_service: Arc<TtsService>,
    tts_controller: Arc<TtsController>,
    extract_controller: Arc<ExtractController>,
) -> Router {
    let tts_routes = Router::new()
        .route("/synthesize", post(TtsController::synthesize))
        .with_state(tts_controller);

    let extract_routes = Router::new()
        .route("/extract", post(ExtractController::extract))
        .with_state(extract_controller);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(tts_service)
        .merge(tts_routes)
        .merge(extract_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors_allowed_origins)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(X_FALLBACK),
            HeaderName::from_static(X_ERROR),
            HeaderName::from_static(X_REQUEST_ID),
        ])
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_service: Arc<TtsService>,
    tts_controller: Arc<TtsController>,
    extract_controller: Arc<ExtractController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(&config, tts_service, tts_controller, extract_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
