/// LLM Client — the single point of entry for all model calls in the service.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod retry;

use self::retry::RetryPolicy;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in the service.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    /// Transient failures eligible for backoff and re-attempt: transport
    /// errors, rate limiting, server overload, and empty payloads.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::EmptyContent => true,
            LlmError::MissingApiKey | LlmError::Exhausted { .. } => false,
        }
    }

    /// Failures the operator must fix in configuration rather than retry.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LlmError::MissingApiKey
                | LlmError::Api {
                    status: 401 | 403,
                    ..
                }
        )
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by all services.
/// Wraps the Anthropic Messages API with bounded retries and exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    policy: RetryPolicy,
}

impl LlmClient {
    /// Builds a client from an explicit credential. A blank key is a fatal
    /// configuration error; no call will be attempted with it.
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            policy: RetryPolicy::default(),
        })
    }

    /// Makes a call to the model, retrying transient failures per the policy.
    ///
    /// Each attempt is a fresh request; the backoff sleeps run on this call's
    /// own timer, so dropping the returned future cancels both the in-flight
    /// request and any pending sleep.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        retry::run_with_retry(&self.policy, |attempt| {
            self.attempt(&request_body, attempt)
        })
        .await
    }

    /// One request/response cycle. Classification of the outcome is left to
    /// `LlmError::is_retryable`, which the retry driver consults.
    async fn attempt(
        &self,
        body: &AnthropicRequest<'_>,
        attempt: u32,
    ) -> Result<LlmResponse, LlmError> {
        debug!("LLM call attempt {attempt} (model: {MODEL})");

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        match llm_response.text() {
            Some(text) if !text.trim().is_empty() => Ok(llm_response),
            _ => Err(LlmError::EmptyContent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_a_fatal_configuration_error() {
        assert!(matches!(
            LlmClient::new(String::new()),
            Err(LlmError::MissingApiKey)
        ));
        assert!(matches!(
            LlmClient::new("   ".to_string()),
            Err(LlmError::MissingApiKey)
        ));
        assert!(LlmClient::new("sk-test".to_string()).is_ok());
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        for status in [429, 500, 502, 503, 529] {
            let err = LlmError::Api {
                status,
                message: "overloaded".to_string(),
            };
            assert!(err.is_retryable(), "status {status} should be retryable");
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for status in [400, 401, 403, 404] {
            let err = LlmError::Api {
                status,
                message: "rejected".to_string(),
            };
            assert!(!err.is_retryable(), "status {status} must not be retried");
        }
    }

    #[test]
    fn test_empty_content_is_retryable_but_missing_key_is_not() {
        assert!(LlmError::EmptyContent.is_retryable());
        assert!(!LlmError::MissingApiKey.is_retryable());
    }

    #[test]
    fn test_auth_rejections_are_configuration_errors() {
        assert!(LlmError::MissingApiKey.is_configuration());
        for status in [401, 403] {
            assert!(LlmError::Api {
                status,
                message: "bad key".to_string()
            }
            .is_configuration());
        }
        assert!(!LlmError::EmptyContent.is_configuration());
        assert!(!LlmError::Api {
            status: 429,
            message: "slow down".to_string()
        }
        .is_configuration());
    }

    #[test]
    fn test_exhausted_error_names_attempts_and_cause() {
        let err = LlmError::Exhausted {
            attempts: 3,
            last: Box::new(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            }),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("3 attempts"));
        assert!(rendered.contains("529"));
    }

    #[test]
    fn test_empty_response_text_is_none() {
        let response = LlmResponse {
            content: vec![],
            usage: Usage {
                input_tokens: 10,
                output_tokens: 0,
            },
        };
        assert!(response.text().is_none());
    }

    #[test]
    fn test_response_text_takes_first_text_block() {
        let response = LlmResponse {
            content: vec![
                ContentBlock {
                    block_type: "thinking".to_string(),
                    text: None,
                },
                ContentBlock {
                    block_type: "text".to_string(),
                    text: Some("tailored output".to_string()),
                },
            ],
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        };
        assert_eq!(response.text(), Some("tailored output"));
    }
}
