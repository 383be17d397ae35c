use tracing::{info, warn};

use crate::client::{ModelClient, ModelMetadata};
use crate::consistency::{check_scores, ScoreViolation};
use crate::decoder::decode_reply;
use crate::error::Result;
use crate::prompt::{build_analysis_prompt, PROMPT_VERSION};
use crate::types::{AnalysisRequest, AnalysisResult};

/// Full outcome of a successful analysis.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    /// Provider metadata of the single model call.
    pub metadata: ModelMetadata,
    /// Score invariants the model's reply breaks. Informational only.
    pub violations: Vec<ScoreViolation>,
}

/// Analysis orchestrator.
///
/// Validates the request, builds the prompt, calls the model exactly once
/// and decodes its reply. Holds no state between calls.
pub struct Analyzer<'a, C: ModelClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ModelClient + ?Sized> Analyzer<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Analyze a document against a rubric.
    pub async fn analyze(
        &self,
        rubric: &str,
        document: &str,
        provider: &str,
        language: &str,
    ) -> Result<AnalysisResult> {
        let request = AnalysisRequest::new(rubric, document, provider, language);
        Ok(self.analyze_detailed(&request).await?.result)
    }

    /// Analyze a request, keeping provider metadata and score diagnostics.
    pub async fn analyze_detailed(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        request.validate()?;

        let prompt = build_analysis_prompt(&request.rubric, &request.document);
        info!(
            provider = %request.provider,
            language = %request.language,
            prompt_version = PROMPT_VERSION,
            prompt_len = prompt.len(),
            "analyzing document"
        );

        let answer = self
            .client
            .invoke(&request.provider, &prompt, &request.language)
            .await
            .inspect_err(|e| warn!(provider = %request.provider, error = %e, "model invocation failed"))?;

        let result = decode_reply(&answer.text)
            .inspect_err(|e| warn!(provider = %request.provider, error = %e, "analysis reply rejected"))?;

        let violations = check_scores(&result);
        for violation in &violations {
            warn!(provider = %request.provider, %violation, "score invariant violated");
        }

        info!(
            provider = %request.provider,
            categories = result.categories.len(),
            items = result.item_count(),
            score = result.score,
            input_tokens = answer.metadata.input_tokens,
            output_tokens = answer.metadata.output_tokens,
            "analysis complete"
        );

        Ok(AnalysisReport {
            result,
            metadata: answer.metadata,
            violations,
        })
    }
}
