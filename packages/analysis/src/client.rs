use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::ModelError;

/// Provider-side details of a model call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMetadata {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Reply from the model collaborator.
#[derive(Debug, Clone)]
pub struct ModelAnswer {
    pub text: String,
    pub metadata: ModelMetadata,
}

/// The model collaborator: one prompt in, one textual reply out.
///
/// Implementations own timeouts and cancellation; callers invoke once per
/// analysis and never retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(
        &self,
        provider: &str,
        prompt: &str,
        language: &str,
    ) -> Result<ModelAnswer, ModelError>;
}

/// Anthropic Messages API client.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    provider: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    model: String,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Deserialize)]
struct AnthropicErrorResponse {
    error: Option<AnthropicErrorDetail>,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

impl AnthropicClient {
    pub fn new(config: &AnalysisConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            provider: config.provider.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// An empty provider id selects the configured provider.
    fn serves(&self, provider: &str) -> bool {
        provider.is_empty() || provider == self.provider
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn invoke(
        &self,
        provider: &str,
        prompt: &str,
        language: &str,
    ) -> Result<ModelAnswer, ModelError> {
        if !self.serves(provider) {
            return Err(ModelError::UnknownProvider(provider.to_string()));
        }

        let url = format!("{}/v1/messages", self.api_base_url);
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: [AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(provider, language, model = %self.model, "sending LLM request");

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "LLM request failed"))?;

        let status = resp.status().as_u16();

        if status == 429 {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            warn!(retry_after, "LLM rate limited");
            return Err(ModelError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            warn!(status, body = %body_text, "LLM API error");
            let message = serde_json::from_str::<AnthropicErrorResponse>(&body_text)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body_text);
            return Err(ModelError::Api { status, message });
        }

        let api_response: AnthropicResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::ResponseParse(e.to_string()))?;

        let text = api_response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        let model = if api_response.model.is_empty() {
            self.model.clone()
        } else {
            api_response.model
        };

        Ok(ModelAnswer {
            text,
            metadata: ModelMetadata {
                model,
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
        })
    }
}

/// Test utilities for the model client.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// One recorded call to [`MockModelClient::invoke`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub provider: String,
        pub prompt: String,
        pub language: String,
    }

    /// Mock model client. Returns pre-configured answers in order and
    /// records every call.
    pub struct MockModelClient {
        answers: Mutex<Vec<Result<ModelAnswer, ModelError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockModelClient {
        pub fn new(answers: Vec<Result<ModelAnswer, ModelError>>) -> Self {
            // Reverse so we can pop from the end
            let mut answers = answers;
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_reply(text: &str) -> Self {
            Self::new(vec![Ok(ModelAnswer {
                text: text.to_string(),
                metadata: ModelMetadata {
                    model: "mock".into(),
                    input_tokens: 100,
                    output_tokens: 200,
                },
            })])
        }

        pub fn with_error(error: ModelError) -> Self {
            Self::new(vec![Err(error)])
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl ModelClient for MockModelClient {
        async fn invoke(
            &self,
            provider: &str,
            prompt: &str,
            language: &str,
        ) -> Result<ModelAnswer, ModelError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(RecordedCall {
                    provider: provider.to_string(),
                    prompt: prompt.to_string(),
                    language: language.to_string(),
                });
            }
            let mut answers = self
                .answers
                .lock()
                .map_err(|e| ModelError::ResponseParse(format!("mock lock poisoned: {e}")))?;
            answers.pop().unwrap_or(Err(ModelError::EmptyResponse))
        }
    }
}
