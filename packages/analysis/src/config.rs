use crate::error::{AnalysisError, Result};

const DEFAULT_PROVIDER: &str = "anthropic";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_LANGUAGE: &str = "zh";

/// Configuration for the model collaborator and analysis defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub api_base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub language: String,
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| AnalysisError::Config("LLM_API_KEY not set".into()))?;

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.into());

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let api_base_url =
            std::env::var("LLM_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());

        let temperature = std::env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);

        let max_tokens = std::env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8192);

        let timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(180);

        let language =
            std::env::var("ANALYSIS_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.into());

        Ok(Self {
            provider,
            model,
            api_key,
            api_base_url,
            temperature,
            max_tokens,
            timeout_secs,
            language,
        })
    }

    /// Create a config builder for testing.
    pub fn builder(api_key: impl Into<String>) -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: AnalysisConfig {
                provider: DEFAULT_PROVIDER.into(),
                model: DEFAULT_MODEL.into(),
                api_key: api_key.into(),
                api_base_url: DEFAULT_API_BASE_URL.into(),
                temperature: 0.0,
                max_tokens: 8192,
                timeout_secs: 180,
                language: DEFAULT_LANGUAGE.into(),
            },
        }
    }
}

/// Builder for constructing `AnalysisConfig` in tests.
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.config.provider = provider.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.config.api_base_url = api_base_url.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    pub fn build(self) -> AnalysisConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AnalysisConfig::builder("key").build();
        assert_eq!(config.provider, "anthropic");
        assert_eq!(config.api_base_url, "https://api.anthropic.com");
        assert_eq!(config.max_tokens, 8192);
        assert_eq!(config.language, "zh");
    }

    #[test]
    fn test_builder_overrides() {
        let config = AnalysisConfig::builder("key")
            .provider("local")
            .model("m")
            .timeout_secs(5)
            .language("en")
            .build();
        assert_eq!(config.provider, "local");
        assert_eq!(config.model, "m");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.language, "en");
    }
}
