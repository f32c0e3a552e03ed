//! Gemini driver tests against a mock HTTP server.

use std::time::Duration;
use toolsmith_core::{ImagePayload, RemoteCall, RemoteMode};
use toolsmith_error::{RemoteErrorKind, RetryableError};
use toolsmith_interface::GenerationDriver;
use toolsmith_models::{GeminiConfig, GeminiDriver};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn driver(server: &MockServer) -> GeminiDriver {
    let config = GeminiConfig::default().with_base_url(server.uri());
    GeminiDriver::new("test-key", config).unwrap()
}

#[tokio::test]
async fn test_text_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "Write a haiku"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Autumn wind"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let call = RemoteCall::new("Write a haiku", RemoteMode::Text, None);
    let payload = driver(&server).generate(&call).await.unwrap();
    assert_eq!(payload, "Autumn wind");
}

#[tokio::test]
async fn test_image_generation_uses_image_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-image:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{
                    "inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}
                }]}
            }]
        })))
        .mount(&server)
        .await;

    let call = RemoteCall::new("A fox logo", RemoteMode::Image, None);
    let payload = driver(&server).generate(&call).await.unwrap();
    assert_eq!(payload, "data:image/png;base64,iVBORw0KGgo=");
}

#[tokio::test]
async fn test_analysis_sends_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [
                {"text": "Describe"},
                {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}}
            ]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "A cat"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let image = ImagePayload::new("image/jpeg", "AAAA");
    let call = RemoteCall::new("Describe", RemoteMode::AnalyzeImage, Some(image));
    assert_eq!(driver(&server).generate(&call).await.unwrap(), "A cat");
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": {"code": 503, "message": "The model is overloaded", "status": "UNAVAILABLE"}
        })))
        .mount(&server)
        .await;

    let call = RemoteCall::new("hi", RemoteMode::Text, None);
    let err = driver(&server).generate(&call).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err.kind, RemoteErrorKind::Http { status_code: 503, .. }));
}

#[tokio::test]
async fn test_rate_limit_is_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let call = RemoteCall::new("hi", RemoteMode::Text, None);
    let err = driver(&server).generate(&call).await.unwrap_err();
    assert!(matches!(err.kind, RemoteErrorKind::QuotaExceeded(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_safety_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    let call = RemoteCall::new("something unsafe", RemoteMode::Text, None);
    let err = driver(&server).generate(&call).await.unwrap_err();
    assert!(matches!(err.kind, RemoteErrorKind::SafetyBlocked(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(serde_json::json!({"candidates": []})),
        )
        .mount(&server)
        .await;

    let config = GeminiConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(1));
    let driver = GeminiDriver::new("test-key", config).unwrap();
    let call = RemoteCall::new("hi", RemoteMode::Text, None);
    let err = driver.generate(&call).await.unwrap_err();
    assert!(matches!(err.kind, RemoteErrorKind::Timeout(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_missing_api_key() {
    let config = GeminiConfig::default().with_api_key_env("TOOLSMITH_TEST_UNSET_KEY");
    let err = GeminiDriver::from_env(config).unwrap_err();
    assert_eq!(
        err.kind,
        RemoteErrorKind::MissingApiKey("TOOLSMITH_TEST_UNSET_KEY".to_string())
    );
}
