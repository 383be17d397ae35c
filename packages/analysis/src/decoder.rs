//! Sanitizing and decoding of raw model replies.

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::types::AnalysisResult;

const FENCE: &str = "```";

/// Strip a markdown code fence wrapped around a model reply.
///
/// Only a fence at the very start of the trimmed reply is recognised. An
/// info string on the opening line (`json`, `JSON`, ...) is dropped with it,
/// and a single closing fence at the end is removed. Text without a leading
/// fence is returned trimmed and otherwise unchanged.
pub fn sanitize_reply(reply: &str) -> &str {
    let trimmed = reply.trim();

    let Some(after_fence) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = strip_info_string(after_fence);
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    body.trim()
}

/// Drop a language tag that directly follows the opening fence.
///
/// The tag is the leading run of `[A-Za-z0-9_+.-]`, whatever comes after it
/// on the same line.
fn strip_info_string(after_fence: &str) -> &str {
    let tag_len = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
        .unwrap_or(after_fence.len());
    &after_fence[tag_len..]
}

/// Decode a raw model reply into an [`AnalysisResult`].
///
/// Scores are taken as returned; nothing is recomputed. On failure the
/// error carries the sanitized text that was rejected.
pub fn decode_reply(reply: &str) -> Result<AnalysisResult> {
    let text = sanitize_reply(reply);
    debug!(
        raw_len = reply.len(),
        sanitized_len = text.len(),
        "decoding analysis reply"
    );

    serde_json::from_str(text).map_err(|source| AnalysisError::ResultParse {
        source,
        text: text.to_string(),
    })
}
