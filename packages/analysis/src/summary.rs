//! Derived views over an [`AnalysisResult`] for report front ends.

use std::fmt;

use crate::types::AnalysisResult;

const NUM_BANDS: usize = 5;

/// An item together with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedItem<'a> {
    pub category: &'a str,
    pub name: &'a str,
    pub score: i64,
}

/// A score interval and the number of items falling into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBand {
    pub min: i64,
    pub max: i64,
    pub count: usize,
}

impl ScoreBand {
    pub fn label(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}

/// All items sorted by score, highest first. Ties keep rubric order.
pub fn ranked_items(result: &AnalysisResult) -> Vec<RankedItem<'_>> {
    let mut items: Vec<RankedItem<'_>> = result
        .categories
        .iter()
        .flat_map(|cat| {
            cat.items.iter().map(move |item| RankedItem {
                category: &cat.name,
                name: &item.name,
                score: item.score,
            })
        })
        .collect();
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items
}

/// Distribution of item scores over five bands fitted to the data.
///
/// Bands are half-open except the last, which includes its upper bound.
/// When every score is 100 the span is widened downwards to 80-100.
/// Empty bands are omitted.
pub fn score_bands(result: &AnalysisResult) -> Vec<ScoreBand> {
    let scores: Vec<i64> = result.items().map(|i| i.score).collect();
    let (Some(&data_min), Some(&data_max)) = (scores.iter().min(), scores.iter().max()) else {
        return Vec::new();
    };

    let mut low = if data_min <= 10 {
        0
    } else {
        (data_min.div_euclid(10) * 10).max(0)
    };
    let high = if data_max >= 90 {
        100
    } else {
        ceil_to_ten(data_max + 5).min(100)
    };
    if high <= low {
        low = (high - 20).max(0);
    }

    let step = (high - low) as f64 / NUM_BANDS as f64;
    let mut bands: Vec<ScoreBand> = (0..NUM_BANDS)
        .filter_map(|i| {
            let min = (low as f64 + i as f64 * step).round() as i64;
            let max = if i == NUM_BANDS - 1 {
                high
            } else {
                (low as f64 + (i + 1) as f64 * step).round() as i64
            };
            (max > min).then_some(ScoreBand { min, max, count: 0 })
        })
        .collect();

    let last = bands.len().saturating_sub(1);
    for score in scores {
        let slot = bands.iter().enumerate().position(|(i, b)| {
            if i < last {
                score >= b.min && score < b.max
            } else {
                score >= b.min && score <= b.max
            }
        });
        if let Some(idx) = slot {
            bands[idx].count += 1;
        }
    }

    bands.retain(|b| b.count > 0);
    bands
}

fn ceil_to_ten(value: i64) -> i64 {
    -((-value).div_euclid(10)) * 10
}

/// Upper bound for a radar chart of category scores.
pub fn radar_max(result: &AnalysisResult) -> f64 {
    let Some(max_score) = result
        .categories
        .iter()
        .map(|c| c.score)
        .reduce(f64::max)
    else {
        return 5.0;
    };

    if max_score <= 5.0 {
        5.0
    } else if max_score <= 10.0 {
        10.0
    } else {
        (max_score * 1.2).ceil()
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Plain-text rendering of a result.
pub struct TextReport<'a>(pub &'a AnalysisResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let meta = [
            ("Unit Name", &result.title),
            ("Designer", &result.designer),
            ("Stage", &result.stage),
            ("Participants", &result.participants),
            ("Grade", &result.grade),
            ("Instructor", &result.instructor),
            ("Subject", &result.subject),
            ("School", &result.school),
            ("Other Subjects", &result.other_subjects),
            ("Textbook", &result.textbook),
        ];

        for (label, value) in meta {
            writeln!(f, "{label}: {}", or_dash(value))?;
        }
        writeln!(f)?;
        writeln!(f, "Overall Score: {}", result.score)?;

        for (idx, category) in result.categories.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. {} (Score: {})", idx + 1, category.name, category.score)?;
            for item in &category.items {
                writeln!(f, "  - {} ({})", item.name, item.score)?;
                writeln!(f, "    Advantages: {}", or_dash(&item.advantage))?;
                writeln!(f, "    Disadvantages: {}", or_dash(&item.disadvantage))?;
                writeln!(f, "    Suggestions: {}", or_dash(&item.suggestion))?;
            }
        }

        Ok(())
    }
}

/// Render the result as a plain-text report.
pub fn render_text(result: &AnalysisResult) -> String {
    TextReport(result).to_string()
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

    fn sample() -> AnalysisResult {
        AnalysisResult {
            title: "勾股定理".into(),
            score: 78.8,
            categories: vec![
                Category {
                    name: "教学目标".into(),
                    score: 86.0,
                    items: vec![item("目标明确", 88), item("目标适切", 84)],
                },
                Category {
                    name: "教学过程".into(),
                    score: 71.5,
                    items: vec![item("环节完整", 84), item("活动设计", 59)],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_ranked_items_descending_stable() {
        let result = sample();
        let ranked = ranked_items(&result);
        let names: Vec<&str> = ranked.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["目标明确", "目标适切", "环节完整", "活动设计"]);
        assert_eq!(ranked[2].category, "教学过程");
    }

    #[test]
    fn test_score_bands() {
        // Spans 50-100 in steps of ten.
        let bands = score_bands(&sample());
        let labels: Vec<String> = bands.iter().map(ScoreBand::label).collect();
        assert_eq!(labels, vec!["50-60", "80-90"]);
        assert_eq!(bands[0].count, 1);
        assert_eq!(bands[1].count, 3);
    }

    #[test]
    fn test_score_bands_empty() {
        assert!(score_bands(&AnalysisResult::default()).is_empty());
    }

    #[test]
    fn test_score_bands_single_score() {
        let result = AnalysisResult {
            categories: vec![Category {
                name: "A".into(),
                score: 100.0,
                items: vec![item("a", 100)],
            }],
            ..Default::default()
        };
        let bands = score_bands(&result);
        assert_eq!(
            bands,
            vec![ScoreBand {
                min: 96,
                max: 100,
                count: 1
            }]
        );
    }

    #[test]
    fn test_radar_max() {
        assert_eq!(radar_max(&AnalysisResult::default()), 5.0);
        assert_eq!(radar_max(&sample()), 104.0);

        let mut small = sample();
        small.categories[0].score = 8.0;
        small.categories[1].score = 4.0;
        assert_eq!(radar_max(&small), 10.0);
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample());
        assert!(text.starts_with("Unit Name: 勾股定理\nDesigner: -\n"));
        assert!(text.contains("Overall Score: 78.8"));
        assert!(text.contains("2. 教学过程 (Score: 71.5)"));
        assert!(text.contains("  - 活动设计 (59)"));
    }

    #[test]
    fn test_text_report_layout() {
        let result = AnalysisResult {
            title: "T".into(),
            score: 90.0,
            categories: vec![Category {
                name: "A".into(),
                score: 90.0,
                items: vec![Item {
                    name: "a1".into(),
                    score: 90,
                    advantage: "clear".into(),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        };
        let expected = "Unit Name: T\nDesigner: -\nStage: -\nParticipants: -\nGrade: -\n\
            Instructor: -\nSubject: -\nSchool: -\nOther Subjects: -\nTextbook: -\n\n\
            Overall Score: 90\n\n1. A (Score: 90)\n  - a1 (90)\n    Advantages: clear\n\
            \x20   Disadvantages: -\n    Suggestions: -\n";
        assert_eq!(format!("{}", TextReport(&result)), expected);
        assert_eq!(render_text(&result), expected);
    }
}
