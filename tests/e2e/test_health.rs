use crate::e2e::helpers;

use helpers::{fakes::StaticFallback, TestApp, TestContext};
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_banner_on_root(ctx: &TestContext) {
    let response = ctx.client.get("/").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body.get("message").and_then(|v| v.as_str()),
        Some("Audicle API Server is running")
    );
    assert_eq!(
        body.get("version").and_then(|v| v.as_str()),
        Some(env!("CARGO_PKG_VERSION"))
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(body.get("tts").and_then(|v| v.as_str()), Some("echo"));
    assert_eq!(
        body.get("fallback_audio").and_then(|v| v.as_bool()),
        Some(true)
    );
}

#[tokio::test]
async fn it_should_report_missing_fallback_asset_in_ready() {
    let ctx = TestApp::default()
        .with_fallback(StaticFallback::Missing)
        .spawn()
        .await
        .unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    // Still ready; synthesis failures degrade to empty audio
    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body.get("fallback_audio").and_then(|v| v.as_bool()),
        Some(false)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_health_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_unique_request_ids(ctx: &TestContext) {
    let first = ctx.client.get("/health").await.unwrap();
    let second = ctx.client.get("/health").await.unwrap();

    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_health_checks(ctx: &TestContext) {
    let mut futures = Vec::new();
    for _ in 0..10 {
        let client = ctx.client.clone();
        futures.push(async move { client.get("/health").await });
    }

    let results = futures::future::join_all(futures).await;

    for result in results {
        let response = result.unwrap();
        response.assert_status(StatusCode::OK);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_allow_configured_cors_origin(ctx: &TestContext) {
    let response = ctx
        .client
        .preflight("/synthesize", "http://localhost:3000")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("access-control-allow-origin", "http://localhost:3000");
    response.assert_header("access-control-allow-credentials", "true");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_allow_unknown_cors_origin(ctx: &TestContext) {
    let response = ctx
        .client
        .preflight("/synthesize", "http://evil.example.com")
        .await
        .unwrap();

    response.assert_header_missing("access-control-allow-origin");
}
