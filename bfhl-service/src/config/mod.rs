use crate::services::dispatcher::DEFAULT_MAX_FIBONACCI_TERMS;
use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;

/// Default collaborator timeout. The dispatcher itself never times out.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BfhlConfig {
    pub common: core_config::Config,
    /// Operator email echoed in every response envelope.
    pub official_email: String,
    /// Longer `fibonacci` requests are rejected with 400.
    pub max_fibonacci_terms: usize,
    pub models: ModelConfig,
    /// `None` when no API key is configured; AI requests then fail individually.
    pub google: Option<GoogleConfig>,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for one-word answers (e.g., gemini-1.5-flash)
    pub text_model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
}

impl BfhlConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(BfhlConfig {
            common: common_config,
            official_email: get_env("OFFICIAL_EMAIL", Some("operator@example.com"), is_prod)?,
            max_fibonacci_terms: match get_optional_env("FIBONACCI_MAX_TERMS") {
                Some(raw) => raw.trim().parse().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "FIBONACCI_MAX_TERMS must be a whole number: {}",
                        e
                    ))
                })?,
                None => DEFAULT_MAX_FIBONACCI_TERMS,
            },
            models: ModelConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                request_timeout_secs: match get_optional_env("GENAI_REQUEST_TIMEOUT_SECS") {
                    Some(raw) => raw.trim().parse().map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "GENAI_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {}",
                            e
                        ))
                    })?,
                    None => DEFAULT_REQUEST_TIMEOUT_SECS,
                },
            },
            google: get_optional_env("GOOGLE_API_KEY").map(|key| GoogleConfig {
                api_key: Secret::new(key),
            }),
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
        })
    }

    /// Configuration for in-process tests: random port, no AI credential.
    pub fn for_tests(official_email: &str) -> Self {
        BfhlConfig {
            common: core_config::Config { port: 0 },
            official_email: official_email.to_string(),
            max_fibonacci_terms: DEFAULT_MAX_FIBONACCI_TERMS,
            models: ModelConfig {
                text_model: "gemini-1.5-flash".to_string(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            google: None,
            otlp_endpoint: None,
        }
    }
}
