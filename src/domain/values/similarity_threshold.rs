use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum Jaccard score for two cross-platform clusters to count as the same event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityThreshold(f64);

impl SimilarityThreshold {
    pub fn new(value: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!(
                "Similarity threshold must be between 0.0 and 1.0, got {value}"
            ));
        }
        Ok(SimilarityThreshold(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn accepts(&self, score: f64) -> bool {
        score >= self.0
    }
}

impl fmt::Display for SimilarityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        SimilarityThreshold(0.35)
    }
}
