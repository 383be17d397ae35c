//! RubricScore analysis pipeline.
//!
//! Builds a prompt from a scoring rubric and a document, asks a language
//! model to apply the rubric, and decodes the reply into a typed
//! [`AnalysisResult`].
//!
//! ```no_run
//! # async fn run() -> rubricscore_analysis::error::Result<()> {
//! use rubricscore_analysis::{AnalysisConfig, Analyzer, AnthropicClient};
//!
//! let config = AnalysisConfig::from_env()?;
//! let client = AnthropicClient::new(&config)?;
//! let result = Analyzer::new(&client)
//!     .analyze("评价量表", "教学设计文本", &config.provider, &config.language)
//!     .await?;
//! println!("{}", result.score);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod client;
pub mod config;
pub mod consistency;
pub mod decoder;
pub mod error;
pub mod prompt;
pub mod summary;
pub mod types;

pub use analyzer::{AnalysisReport, Analyzer};
pub use client::{AnthropicClient, ModelAnswer, ModelClient, ModelMetadata};
#[cfg(any(test, feature = "test-utils"))]
pub use client::test_support::{MockModelClient, RecordedCall};
pub use config::AnalysisConfig;
pub use consistency::{check_scores, ScoreViolation};
pub use decoder::{decode_reply, sanitize_reply};
pub use error::{AnalysisError, ModelError};
pub use prompt::{build_analysis_prompt, PROMPT_VERSION};
pub use types::{AnalysisRequest, AnalysisResult, Category, Item};
