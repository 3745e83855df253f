//! Request dispatch: select, validate, compute.

use crate::models::request::as_integer;
use crate::models::{BfhlRequest, Operation, ValidationError, KEY_MISSING};
use crate::services::numeric::{self, NumericError};
use crate::services::providers::{FinishReason, GenerationParams, ProviderError, TextProvider};
use axum::http::StatusCode;
use num_bigint::BigUint;
use serde_json::{json, Number, Value};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;

/// Fallback message for operational failures that carry no text of their own.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Longest Fibonacci series served unless configured otherwise.
pub const DEFAULT_MAX_FIBONACCI_TERMS: usize = 1000;

/// Output budget for a one-word answer.
pub const ONE_WORD_MAX_TOKENS: i32 = 16;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error("failed to encode result: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("computation task failed: {0}")]
    Task(#[from] JoinError),
}

impl DispatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
            DispatchError::Provider(_)
            | DispatchError::Numeric(_)
            | DispatchError::Encoding(_)
            | DispatchError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text for the failure envelope.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// The instruction sent to the AI collaborator for a user question.
pub fn one_word_prompt(question: &str) -> String {
    format!(
        "Answer the following question in exactly one single word: {}",
        question
    )
}

/// A Fibonacci term as an exact JSON number, however many digits it has.
fn big_number(term: &BigUint) -> Result<Value, serde_json::Error> {
    term.to_string().parse::<Number>().map(Value::Number)
}

/// Picks and runs exactly one operation per request body.
#[derive(Clone)]
pub struct Dispatcher {
    text_provider: Option<Arc<dyn TextProvider>>,
    max_fibonacci_terms: usize,
}

impl Dispatcher {
    /// `text_provider` is `None` when no AI credential is configured.
    pub fn new(text_provider: Option<Arc<dyn TextProvider>>) -> Self {
        Self {
            text_provider,
            max_fibonacci_terms: DEFAULT_MAX_FIBONACCI_TERMS,
        }
    }

    pub fn with_max_fibonacci_terms(mut self, max_terms: usize) -> Self {
        self.max_fibonacci_terms = max_terms;
        self
    }

    pub fn text_provider(&self) -> Option<&Arc<dyn TextProvider>> {
        self.text_provider.as_ref()
    }

    /// Dispatch a body and return the operation name with its outcome.
    pub async fn dispatch(&self, body: &Value) -> (&'static str, Result<Value, DispatchError>) {
        let Some(operation) = Operation::select(body) else {
            return ("none", Err(ValidationError(KEY_MISSING.to_string()).into()));
        };

        let name = operation.name();
        let result = match operation.validate() {
            Ok(request) => self.execute(request).await,
            Err(e) => Err(e.into()),
        };
        (name, result)
    }

    async fn execute(&self, request: BfhlRequest) -> Result<Value, DispatchError> {
        match request {
            BfhlRequest::Fibonacci(n) => {
                if usize::try_from(n).is_ok_and(|n| n > self.max_fibonacci_terms) {
                    return Err(ValidationError(format!(
                        "fibonacci must be at most {}",
                        self.max_fibonacci_terms
                    ))
                    .into());
                }
                let terms = numeric::fibonacci(n)
                    .iter()
                    .map(big_number)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(terms))
            }
            BfhlRequest::Prime(items) => {
                // Trial division on 63-bit entries takes seconds; keep it off the runtime.
                let primes = tokio::task::spawn_blocking(move || {
                    items
                        .iter()
                        .filter_map(as_integer)
                        .filter(|&x| numeric::is_prime(x))
                        .collect::<Vec<i64>>()
                })
                .await?;
                Ok(json!(primes))
            }
            BfhlRequest::Lcm(values) => Ok(json!(numeric::reduce_lcm(&values)?)),
            BfhlRequest::Hcf(values) => Ok(json!(numeric::reduce_hcf(&values))),
            BfhlRequest::Ai(question) => self.answer(&question).await.map(Value::String),
        }
    }

    /// Ask the collaborator for a one-word answer and keep its first token.
    async fn answer(&self, question: &str) -> Result<String, DispatchError> {
        let provider = self.text_provider.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("GOOGLE_API_KEY is not set".to_string())
        })?;

        let params = GenerationParams {
            temperature: Some(0.0),
            max_tokens: Some(ONE_WORD_MAX_TOKENS),
        };
        let response = provider.generate(&one_word_prompt(question), &params).await?;

        metrics::counter!("bfhl_ai_tokens_total", "type" => "input")
            .increment(response.input_tokens);
        metrics::counter!("bfhl_ai_tokens_total", "type" => "output")
            .increment(response.output_tokens);

        if response.finish_reason == FinishReason::Length {
            // The first word is all that is kept, so a cut-off answer still serves.
            tracing::warn!(
                output_tokens = response.output_tokens,
                max_tokens = ONE_WORD_MAX_TOKENS,
                "AI answer hit the output token limit"
            );
        } else {
            tracing::debug!(
                finish_reason = response.finish_reason.as_str(),
                output_tokens = response.output_tokens,
                "AI provider answered"
            );
        }

        response
            .text
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("AI response text was empty".to_string()).into()
            })
    }
}
