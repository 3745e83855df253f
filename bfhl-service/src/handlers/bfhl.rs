use crate::models::Envelope;
use crate::services::{record_operation, DispatchError};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// `POST /bfhl`: run exactly one operation and wrap the outcome in an envelope.
pub async fn process(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let email = state.config.official_email.as_str();

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            record_operation("none", "invalid");
            return (
                StatusCode::BAD_REQUEST,
                Json(Envelope::failure(email, rejection.body_text())),
            )
                .into_response();
        }
    };

    let (operation, result) = state.dispatcher.dispatch(&body).await;

    match result {
        Ok(data) => {
            record_operation(operation, "success");
            (StatusCode::OK, Json(Envelope::success(email, data))).into_response()
        }
        Err(err @ DispatchError::Validation(_)) => {
            tracing::debug!(operation, error = %err, "Validation failed");
            record_operation(operation, "invalid");
            (err.status_code(), Json(Envelope::failure(email, err.message()))).into_response()
        }
        Err(err) => {
            tracing::error!(operation, error = %err, "Error processing request");
            record_operation(operation, "error");
            (err.status_code(), Json(Envelope::failure(email, err.message()))).into_response()
        }
    }
}
