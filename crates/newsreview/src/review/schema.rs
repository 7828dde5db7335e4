use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const MAX_SCORE: i64 = 100;
pub const MAX_COMMENT_CHARS: usize = 30;
pub const EXPECTED_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: i64,
    pub comment: String,
}

/// The assessment the model is instructed to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub objectivity: DimensionScore,
    pub density: DimensionScore,
    pub readability: DimensionScore,
    pub headline: DimensionScore,
    pub structure: DimensionScore,
    pub suggestions: Vec<String>,
}

impl ReviewResult {
    pub fn dimensions(&self) -> [(&'static str, &DimensionScore); 5] {
        [
            ("objectivity", &self.objectivity),
            ("density", &self.density),
            ("readability", &self.readability),
            ("headline", &self.headline),
            ("structure", &self.structure),
        ]
    }

    pub fn average_score(&self) -> f64 {
        let dimensions = self.dimensions();
        let total: i64 = dimensions.iter().map(|(_, d)| d.score).sum();
        total as f64 / dimensions.len() as f64
    }

    pub fn violations(&self) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        for (name, dimension) in self.dimensions() {
            if !(0..=MAX_SCORE).contains(&dimension.score) {
                violations.push(SchemaViolation::ScoreOutOfRange {
                    dimension: name,
                    score: dimension.score,
                });
            }
            let chars = dimension.comment.chars().count();
            if chars > MAX_COMMENT_CHARS {
                violations.push(SchemaViolation::CommentTooLong {
                    dimension: name,
                    chars,
                });
            }
        }
        if self.suggestions.len() != EXPECTED_SUGGESTIONS {
            violations.push(SchemaViolation::SuggestionCount(self.suggestions.len()));
        }
        violations
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("reply does not match the review shape: {0}")]
    Shape(String),

    #[error("{dimension} score {score} is outside 0-100")]
    ScoreOutOfRange { dimension: &'static str, score: i64 },

    #[error("{dimension} comment has {chars} characters")]
    CommentTooLong { dimension: &'static str, chars: usize },

    #[error("expected 3 suggestions, got {0}")]
    SuggestionCount(usize),
}

/// Checks a parsed model reply against the review schema. The reply itself is
/// never modified; the result only feeds diagnostics.
pub fn check_review(value: &Value) -> Result<ReviewResult, Vec<SchemaViolation>> {
    let review: ReviewResult = serde_json::from_value(value.clone())
        .map_err(|err| vec![SchemaViolation::Shape(err.to_string())])?;
    let violations = review.violations();
    if violations.is_empty() {
        Ok(review)
    } else {
        Err(violations)
    }
}
