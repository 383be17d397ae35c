//! Request and result types of the analysis pipeline.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AnalysisError, Result};

/// Input for a single analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Evaluation rubric the document is scored against.
    pub rubric: String,
    /// Text of the document under review.
    pub document: String,
    pub provider: String,
    pub language: String,
}

impl AnalysisRequest {
    pub fn new(
        rubric: impl Into<String>,
        document: impl Into<String>,
        provider: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            rubric: rubric.into(),
            document: document.into(),
            provider: provider.into(),
            language: language.into(),
        }
    }

    /// Check the preconditions for building a prompt. The rubric is checked first.
    pub fn validate(&self) -> Result<()> {
        if self.rubric.is_empty() {
            return Err(AnalysisError::EmptyRubric);
        }
        if self.document.is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }
        Ok(())
    }
}

/// Scoring report decoded from the model reply.
///
/// Field names match the JSON schema embedded in the prompt. Missing fields
/// and `null` values decode to their zero value; values of the wrong type
/// fail decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub designer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participants: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grade: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub other_subjects: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub textbook: String,
    /// Mean of all item scores, one decimal place.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    /// In rubric order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
}

impl AnalysisResult {
    /// Iterate over every item across all categories, in order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Top-level rubric grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Mean of the item scores, two decimal places.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

/// A single scored criterion with commentary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Expected in 0..=100; out-of-range values are kept as returned.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advantage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disadvantage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestion: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
