use crate::e2e::helpers;

use audicle_api::{
    domain::tts::{SynthesisError, VoiceSelection},
    infrastructure::{
        oauth::GoogleServiceAccountClient,
        repositories::{GoogleTtsRepository, PollyTtsRepository, TtsRepository},
    },
};
use helpers::{
    aws_mocks::{create_mock_polly_client, mock_audio_bytes, start_mock_polly_server, PollyBehavior},
    google_mocks::{MockGoogleServer, SynthesizeBehavior, MOCK_ACCESS_TOKEN},
    TestApp, FALLBACK_AUDIO,
};
use hyper::StatusCode;
use serde_json::json;
use std::sync::Arc;

fn ja_voice() -> VoiceSelection {
    VoiceSelection::from_name("ja-JP-Neural2-B", "ja-JP")
}

fn google_repository(server: &MockGoogleServer) -> GoogleTtsRepository {
    let http_client = reqwest::Client::new();
    let auth = GoogleServiceAccountClient::from_json(
        &server.service_account_json(),
        http_client.clone(),
    )
    .unwrap();

    GoogleTtsRepository::new(http_client, Arc::new(auth), server.base_url.clone(), 2.0)
}

#[tokio::test]
async fn it_should_synthesize_through_google_with_service_account_token() {
    let server = MockGoogleServer::start(SynthesizeBehavior::Echo)
        .await
        .unwrap();
    let repo = google_repository(&server);

    let audio = repo
        .synthesize_chunk("こんにちは。", &ja_voice())
        .await
        .unwrap();

    assert_eq!(audio, "[こんにちは。]".as_bytes());

    let recorded = server.recorded.lock().unwrap();
    assert_eq!(recorded.token_requests, 1);
    assert_eq!(
        recorded.authorization_headers,
        vec![format!("Bearer {}", MOCK_ACCESS_TOKEN)]
    );
    assert_eq!(
        recorded.synthesize_bodies[0],
        json!({
            "input": { "text": "こんにちは。" },
            "voice": { "languageCode": "ja-JP", "name": "ja-JP-Neural2-B" },
            "audioConfig": { "audioEncoding": "MP3", "speakingRate": 2.0 }
        })
    );
}

#[tokio::test]
async fn it_should_reuse_cached_google_token_across_chunks() {
    let server = MockGoogleServer::start(SynthesizeBehavior::Echo)
        .await
        .unwrap();
    let repo = google_repository(&server);

    for text in ["一。", "二。", "三。"] {
        repo.synthesize_chunk(text, &ja_voice()).await.unwrap();
    }

    let recorded = server.recorded.lock().unwrap();
    assert_eq!(recorded.token_requests, 1);
    assert_eq!(recorded.synthesize_bodies.len(), 3);
}

#[tokio::test]
async fn it_should_classify_google_bad_request_as_rejected() {
    let server = MockGoogleServer::start(SynthesizeBehavior::Status(StatusCode::BAD_REQUEST))
        .await
        .unwrap();
    let repo = google_repository(&server);

    let err = repo
        .synthesize_chunk("こんにちは。", &ja_voice())
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Rejected(_)), "{:?}", err);
}

#[tokio::test]
async fn it_should_classify_google_quota_errors_as_unavailable() {
    let server =
        MockGoogleServer::start(SynthesizeBehavior::Status(StatusCode::TOO_MANY_REQUESTS))
            .await
            .unwrap();
    let repo = google_repository(&server);

    let err = repo
        .synthesize_chunk("こんにちは。", &ja_voice())
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Unavailable(_)), "{:?}", err);
}

#[tokio::test]
async fn it_should_report_refused_service_account_as_misconfigured() {
    let server = MockGoogleServer::start_with_token_status(
        SynthesizeBehavior::Echo,
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    let repo = google_repository(&server);

    let err = repo
        .synthesize_chunk("こんにちは。", &ja_voice())
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Misconfigured(_)), "{:?}", err);
    assert!(server.recorded.lock().unwrap().synthesize_bodies.is_empty());
}

#[tokio::test]
async fn it_should_refresh_google_token_after_unauthorized() {
    let server = MockGoogleServer::start(SynthesizeBehavior::Status(StatusCode::UNAUTHORIZED))
        .await
        .unwrap();
    let repo = google_repository(&server);

    for _ in 0..2 {
        let err = repo
            .synthesize_chunk("こんにちは。", &ja_voice())
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Unavailable(_)), "{:?}", err);
    }

    // Each rejected token is dropped, so every attempt exchanges a new one
    assert_eq!(server.recorded.lock().unwrap().token_requests, 2);
}

#[tokio::test]
async fn it_should_fall_back_when_google_fails_mid_request() {
    let server =
        MockGoogleServer::start(SynthesizeBehavior::Status(StatusCode::SERVICE_UNAVAILABLE))
            .await
            .unwrap();
    let ctx = TestApp::default()
        .with_tts_repo(Arc::new(google_repository(&server)))
        .spawn()
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": "こんにちは。" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-fallback", "true");
    assert!(response
        .header("x-error")
        .is_some_and(|e| e.starts_with("provider unavailable")));
    assert_eq!(response.body_bytes, FALLBACK_AUDIO);
}

#[tokio::test]
async fn it_should_synthesize_through_polly() {
    let endpoint = start_mock_polly_server(PollyBehavior::Audio(mock_audio_bytes()))
        .await
        .unwrap();
    let repo = PollyTtsRepository::new(Arc::new(create_mock_polly_client(&endpoint)), 1.0);

    let audio = repo
        .synthesize_chunk("こんにちは。", &VoiceSelection::from_name("Takumi", "ja-JP"))
        .await
        .unwrap();

    assert_eq!(audio, mock_audio_bytes());
}

#[tokio::test]
async fn it_should_classify_polly_text_length_exceeded_as_rejected() {
    let endpoint = start_mock_polly_server(PollyBehavior::Error(
        StatusCode::BAD_REQUEST,
        "TextLengthExceededException",
    ))
    .await
    .unwrap();
    let repo = PollyTtsRepository::new(Arc::new(create_mock_polly_client(&endpoint)), 1.0);

    let err = repo
        .synthesize_chunk("こんにちは。", &VoiceSelection::from_name("Takumi", "ja-JP"))
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Rejected(_)), "{:?}", err);
}

#[tokio::test]
async fn it_should_classify_polly_unknown_voice_as_rejected() {
    let endpoint = start_mock_polly_server(PollyBehavior::Error(
        StatusCode::BAD_REQUEST,
        "ValidationException",
    ))
    .await
    .unwrap();
    let repo = PollyTtsRepository::new(Arc::new(create_mock_polly_client(&endpoint)), 1.0);

    let err = repo
        .synthesize_chunk("こんにちは。", &VoiceSelection::from_name("Nobody", "ja-JP"))
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Rejected(_)), "{:?}", err);
}

#[tokio::test]
async fn it_should_fall_back_when_polly_is_unreachable() {
    // Nothing listens on the discard port
    let repo = PollyTtsRepository::new(
        Arc::new(create_mock_polly_client("http://127.0.0.1:9")),
        1.0,
    );
    let ctx = TestApp::default()
        .with_tts_repo(Arc::new(repo))
        .spawn()
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": "こんにちは。" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-fallback", "true");
    assert_eq!(response.body_bytes, FALLBACK_AUDIO);
}
