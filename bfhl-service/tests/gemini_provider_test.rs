//! Gemini provider against a local stand-in for the generative-language API.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bfhl_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use bfhl_service::services::providers::{GenerationParams, ProviderError, TextProvider};
use secrecy::Secret;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve canned replies keyed by the API key in the query string.
async fn generate_content(
    Path(model_method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(request): Json<Value>,
) -> impl IntoResponse {
    assert_eq!(model_method, "test-model:generateContent");
    let prompt = request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    match query.get("key").map(String::as_str) {
        Some("ok") => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": format!("Echo {}", prompt) }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 5, "candidatesTokenCount": 2 }
            })),
        ),
        Some("empty") => (StatusCode::OK, Json(json!({ "candidates": [] }))),
        Some("busy") => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": { "message": "quota" } })),
        ),
        _ => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "message": "API key not valid" } })),
        ),
    }
}

async fn list_models(Query(query): Query<HashMap<String, String>>) -> StatusCode {
    if query.get("key").map(String::as_str) == Some("ok") {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    }
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/v1beta/models/:model_method", post(generate_content))
        .route("/v1beta/models", get(list_models));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}/v1beta", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    address
}

fn provider(base_url: &str, key: &str) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new(key.to_string()),
        model: "test-model".to_string(),
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn generate_returns_first_candidate_text() {
    let base_url = spawn_stub().await;

    let response = provider(&base_url, "ok")
        .generate("hello", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(response.text, "Echo hello");
    assert_eq!(response.input_tokens, 5);
    assert_eq!(response.output_tokens, 2);
}

#[tokio::test]
async fn empty_candidates_are_malformed() {
    let base_url = spawn_stub().await;

    let err = provider(&base_url, "empty")
        .generate("hello", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn http_errors_are_classified() {
    let base_url = spawn_stub().await;

    let err = provider(&base_url, "busy")
        .generate("hello", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));

    let err = provider(&base_url, "bad")
        .generate("hello", &GenerationParams::default())
        .await
        .unwrap_err();
    match err {
        ProviderError::ApiError(message) => assert!(message.contains("403")),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    let err = provider("http://127.0.0.1:9/v1beta", "ok")
        .generate("hello", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
}

#[tokio::test]
async fn health_check_uses_model_listing() {
    let base_url = spawn_stub().await;

    assert!(provider(&base_url, "ok").health_check().await.is_ok());
    assert!(provider(&base_url, "bad").health_check().await.is_err());
    assert!(matches!(
        provider(&base_url, "").health_check().await,
        Err(ProviderError::NotConfigured(_))
    ));
}
