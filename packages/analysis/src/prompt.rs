//! Prompt construction for rubric-based analysis.
//!
//! The template is a versioned constant: the field order and nesting of the
//! embedded JSON schema are part of the contract with the model and must
//! stay in sync with [`crate::types::AnalysisResult`].

/// Version of the analysis prompt template.
pub const PROMPT_VERSION: &str = "v1";

const ANALYSIS_INTRO: &str = "请对以下教学设计文本进行深度分析，根据提供的评价量表对每个二级评价项进行评分（0-100分制）和详细分析。\n\n评价量表：\n";
const DOCUMENT_HEADING: &str = "\n\n教学设计文本：\n";
const ANALYSIS_SCHEMA: &str = include_str!("../prompts/analysis_schema_v1.txt");

/// Build the analysis prompt for a rubric and a document.
///
/// Both texts are embedded verbatim. Output is a pure function of the inputs.
pub fn build_analysis_prompt(rubric: &str, document: &str) -> String {
    let mut prompt = String::with_capacity(
        ANALYSIS_INTRO.len()
            + rubric.len()
            + DOCUMENT_HEADING.len()
            + document.len()
            + ANALYSIS_SCHEMA.len(),
    );

    prompt.push_str(ANALYSIS_INTRO);
    prompt.push_str(rubric);
    prompt.push_str(DOCUMENT_HEADING);
    prompt.push_str(document);
    prompt.push_str(ANALYSIS_SCHEMA);

    prompt
}
