use crate::models::Envelope;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Touches nothing but configuration.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(Envelope::alive(&state.config.official_email)),
    )
}

/// Readiness probe: checks the AI collaborator when one is configured.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(provider) = state.dispatcher.text_provider() else {
        return (
            StatusCode::OK,
            Json(json!({ "status": "ready", "ai": "disabled" })),
        );
    };

    match provider.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "ai": "ok" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "AI provider health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "ai": "unavailable", "error": e.to_string() })),
            )
        }
    }
}
