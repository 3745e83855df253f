//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Truncated(String),
    ApiError(String),
    Malformed,
}

/// Mock text provider returning a scripted reply and recording prompts.
pub struct MockTextProvider {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
    max_tokens: Mutex<Vec<Option<i32>>>,
}

impl MockTextProvider {
    /// Reply with `text` verbatim.
    pub fn answering(text: &str) -> Self {
        Self::with_reply(MockReply::Text(text.to_string()))
    }

    /// Reply with `text` as if generation stopped at the output token limit.
    pub fn truncated(text: &str) -> Self {
        Self::with_reply(MockReply::Truncated(text.to_string()))
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self::with_reply(MockReply::ApiError(message.to_string()))
    }

    /// Fail every call as if the upstream payload had the wrong shape.
    pub fn malformed() -> Self {
        Self::with_reply(MockReply::Malformed)
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
            max_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    /// Output token limits requested so far, oldest first.
    pub fn max_tokens(&self) -> Vec<Option<i32>> {
        self.max_tokens
            .lock()
            .map(|limits| limits.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Ok(mut limits) = self.max_tokens.lock() {
            limits.push(params.max_tokens);
        }

        match &self.reply {
            MockReply::Text(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as u64 / 4,
                output_tokens: 1,
                finish_reason: FinishReason::Complete,
            }),
            MockReply::Truncated(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as u64 / 4,
                output_tokens: params.max_tokens.map_or(1, |limit| limit.max(0) as u64),
                finish_reason: FinishReason::Length,
            }),
            MockReply::ApiError(message) => Err(ProviderError::ApiError(message.clone())),
            MockReply::Malformed => Err(ProviderError::MalformedResponse(
                "first candidate has no text part".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.reply {
            MockReply::Text(_) | MockReply::Truncated(_) => Ok(()),
            MockReply::ApiError(message) => Err(ProviderError::ApiError(message.clone())),
            MockReply::Malformed => Ok(()),
        }
    }
}
