//! Score invariant checks for decoded results.
//!
//! The decoder passes scores through as the model produced them. These
//! checks only report violations; they never correct a result.

use std::fmt;

use crate::types::AnalysisResult;

/// Lowest valid item score.
pub const MIN_ITEM_SCORE: i64 = 0;
/// Highest valid item score.
pub const MAX_ITEM_SCORE: i64 = 100;

/// Category scores are rounded to two decimals.
const CATEGORY_TOLERANCE: f64 = 0.005 + 1e-9;
/// The overall score is rounded to one decimal.
const OVERALL_TOLERANCE: f64 = 0.05 + 1e-9;

/// A broken score invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreViolation {
    ItemOutOfRange {
        category: String,
        item: String,
        score: i64,
    },
    CategoryMeanMismatch {
        category: String,
        reported: f64,
        expected: f64,
    },
    OverallMeanMismatch { reported: f64, expected: f64 },
}

impl fmt::Display for ScoreViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemOutOfRange {
                category,
                item,
                score,
            } => write!(
                f,
                "item '{item}' in category '{category}' has score {score} outside {MIN_ITEM_SCORE}-{MAX_ITEM_SCORE}"
            ),
            Self::CategoryMeanMismatch {
                category,
                reported,
                expected,
            } => write!(
                f,
                "category '{category}' reports score {reported} but its items average {expected:.2}"
            ),
            Self::OverallMeanMismatch { reported, expected } => write!(
                f,
                "overall score {reported} does not match item average {expected:.1}"
            ),
        }
    }
}

/// Check item ranges and the category/overall mean invariants.
///
/// Categories without items are skipped for the mean check, and the overall
/// check is skipped when the result has no items at all.
pub fn check_scores(result: &AnalysisResult) -> Vec<ScoreViolation> {
    let mut violations = Vec::new();

    for category in &result.categories {
        for item in &category.items {
            if !(MIN_ITEM_SCORE..=MAX_ITEM_SCORE).contains(&item.score) {
                violations.push(ScoreViolation::ItemOutOfRange {
                    category: category.name.clone(),
                    item: item.name.clone(),
                    score: item.score,
                });
            }
        }

        if let Some(expected) = mean(category.items.iter().map(|i| i.score)) {
            if (category.score - expected).abs() > CATEGORY_TOLERANCE {
                violations.push(ScoreViolation::CategoryMeanMismatch {
                    category: category.name.clone(),
                    reported: category.score,
                    expected,
                });
            }
        }
    }

    if let Some(expected) = mean(result.items().map(|i| i.score)) {
        if (result.score - expected).abs() > OVERALL_TOLERANCE {
            violations.push(ScoreViolation::OverallMeanMismatch {
                reported: result.score,
                expected,
            });
        }
    }

    violations
}

fn mean(scores: impl Iterator<Item = i64>) -> Option<f64> {
    // i128 so that out-of-range scores cannot overflow the sum.
    let (sum, count) = scores.fold((0i128, 0usize), |(sum, count), s| {
        (sum + i128::from(s), count + 1)
    });
    (count > 0).then(|| sum as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Item};
    use pretty_assertions::assert_eq;

    fn item(name: &str, score: i64) -> Item {
        Item {
            name: name.into(),
            score,
            ..Default::default()
        }
    }

    fn result(score: f64, categories: Vec<Category>) -> AnalysisResult {
        AnalysisResult {
            score,
            categories,
            ..Default::default()
        }
    }

    #[test]
    fn test_consistent_result_has_no_violations() {
        let r = result(
            81.7,
            vec![
                Category {
                    name: "A".into(),
                    score: 85.0,
                    items: vec![item("a1", 80), item("a2", 90)],
                },
                Category {
                    name: "B".into(),
                    score: 75.0,
                    items: vec![item("b1", 75)],
                },
            ],
        );
        assert!(check_scores(&r).is_empty());
    }

    #[test]
    fn test_rounded_category_mean_is_accepted() {
        let r = result(
            83.3,
            vec![Category {
                name: "A".into(),
                score: 83.33,
                items: vec![item("a1", 80), item("a2", 80), item("a3", 90)],
            }],
        );
        assert!(check_scores(&r).is_empty());
    }

    #[test]
    fn test_out_of_range_item() {
        let r = result(
            120.0,
            vec![Category {
                name: "A".into(),
                score: 120.0,
                items: vec![item("a1", 120)],
            }],
        );
        assert_eq!(
            check_scores(&r),
            vec![ScoreViolation::ItemOutOfRange {
                category: "A".into(),
                item: "a1".into(),
                score: 120,
            }]
        );
    }

    #[test]
    fn test_mean_mismatches() {
        let r = result(
            70.0,
            vec![Category {
                name: "A".into(),
                score: 86.0,
                items: vec![item("a1", 88)],
            }],
        );
        let violations = check_scores(&r);
        assert_eq!(violations.len(), 2);
        assert!(matches!(
            &violations[0],
            ScoreViolation::CategoryMeanMismatch { category, .. } if category == "A"
        ));
        assert!(matches!(
            violations[1],
            ScoreViolation::OverallMeanMismatch { reported, .. } if reported == 70.0
        ));
        assert!(violations[1].to_string().contains("88.0"));
    }

    #[test]
    fn test_extreme_scores_do_not_overflow() {
        let r = result(
            0.0,
            vec![Category {
                name: "A".into(),
                score: 0.0,
                items: vec![item("a1", i64::MAX), item("a2", i64::MAX)],
            }],
        );
        let violations = check_scores(&r);
        assert_eq!(violations.len(), 4);
        let ScoreViolation::CategoryMeanMismatch { expected, .. } = &violations[2] else {
            panic!("expected category mismatch, got {:?}", violations[2]);
        };
        assert_eq!(*expected, i64::MAX as f64);
        assert!(matches!(
            violations[3],
            ScoreViolation::OverallMeanMismatch { expected, .. } if expected > 0.0
        ));
    }

    #[test]
    fn test_empty_categories_are_skipped() {
        let r = result(
            0.0,
            vec![Category {
                name: "A".into(),
                score: 50.0,
                items: vec![],
            }],
        );
        assert!(check_scores(&r).is_empty());
    }
}
