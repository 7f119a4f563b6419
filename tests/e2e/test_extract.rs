use crate::e2e::helpers;

use audicle_api::domain::extract::ExtractResponse;
use helpers::{fakes::StubExtractor, TestApp, TestContext};
use hyper::StatusCode;
use serde_json::json;
use std::time::Duration;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_extract_article_content(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/extract", &json!({ "url": "https://example.com/article" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let article: ExtractResponse = response.json().unwrap();
    assert_eq!(article.title, "Test article");
    assert_eq!(
        article.chunks,
        vec!["First paragraph.".to_string(), "Second paragraph.".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_http_urls(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/extract", &json!({ "url": "file:///etc/passwd" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unsafe protocol: file");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_urls(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/extract", &json!({ "url": "not a url" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid URL format");
}

#[tokio::test]
async fn it_should_return_bad_request_when_extraction_fails() {
    let ctx = TestApp::default()
        .with_extractor(StubExtractor::Failing(
            "Error: Could not parse article".to_string(),
        ))
        .spawn()
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/extract", &json!({ "url": "https://example.com/empty" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Extraction failed: Error: Could not parse article");
}

#[tokio::test]
async fn it_should_return_request_timeout_when_extraction_hangs() {
    let ctx = TestApp::default()
        .with_extractor(StubExtractor::Hanging(Duration::from_secs(30)))
        .spawn()
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/extract", &json!({ "url": "https://example.com/slow" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::REQUEST_TIMEOUT)
        .assert_error_message("Extraction timeout");
}

#[tokio::test]
async fn it_should_return_internal_error_for_malformed_extractor_output() {
    let ctx = TestApp::default()
        .with_extractor(StubExtractor::Malformed)
        .spawn()
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/extract", &json!({ "url": "https://example.com/broken" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Failed to parse extraction result");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_extract_responses(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/extract", &json!({ "url": "ftp://example.com" }))
        .await
        .unwrap();

    response.assert_header_exists("x-request-id");
}
