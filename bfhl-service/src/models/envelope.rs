//! The uniform response body shared by every endpoint.

use serde::Serialize;
use serde_json::Value;

/// `{ is_success, official_email, data?, message? }`.
///
/// Success envelopes always carry `data` (possibly `null`); failure
/// envelopes always carry `message`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Envelope {
    pub is_success: bool,
    pub official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn success(official_email: &str, data: Value) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(official_email: &str, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            official_email: official_email.to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    /// Liveness envelope: no data, no message.
    pub fn alive(official_email: &str) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: None,
            message: None,
        }
    }
}
