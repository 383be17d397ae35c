//! Error types for the analysis pipeline.
//!
//! `ModelError` covers failures of the model collaborator itself;
//! `AnalysisError` is what callers of [`crate::Analyzer`] see, and names
//! the stage that failed.

use thiserror::Error;

/// Failure reported by a [`crate::client::ModelClient`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("LLM API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("failed to parse LLM response: {0}")]
    ResponseParse(String),

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error("unknown model provider: '{0}'")]
    UnknownProvider(String),
}

/// Main error type for the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("task evaluation rubric (text) is empty")]
    EmptyRubric,

    #[error("task document text is empty, please upload a document first")]
    EmptyDocument,

    #[error("failed to get analysis from AI model: {0}")]
    ModelInvocation(#[source] ModelError),

    /// The reply could not be decoded. `text` is the sanitized reply.
    #[error("failed to parse AI analysis result as JSON: {source}\nRaw answer: {text}")]
    ResultParse {
        #[source]
        source: serde_json::Error,
        text: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Input was rejected before any model call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyRubric | Self::EmptyDocument)
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::ModelInvocation(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::ResultParse { .. })
    }
}

impl From<ModelError> for AnalysisError {
    fn from(err: ModelError) -> Self {
        Self::ModelInvocation(err)
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invocation_error_keeps_cause() {
        let err = AnalysisError::from(ModelError::Api {
            status: 503,
            message: "overloaded".into(),
        });
        assert!(err.is_invocation());
        assert!(err.to_string().contains("overloaded"));
        let source = err.source().expect("cause should be preserved");
        assert!(source.to_string().contains("503"));
    }

    #[test]
    fn test_parse_error_includes_text() {
        let source = serde_json::from_str::<serde_json::Value>("{oops")
            .expect_err("invalid json");
        let err = AnalysisError::ResultParse {
            source,
            text: "{oops".into(),
        };
        assert!(err.is_decode());
        assert!(err.to_string().ends_with("Raw answer: {oops"));
    }

    #[test]
    fn test_precondition_errors() {
        assert!(AnalysisError::EmptyRubric.is_precondition());
        assert!(AnalysisError::EmptyDocument.is_precondition());
        assert!(!AnalysisError::Config("x".into()).is_precondition());
    }
}
