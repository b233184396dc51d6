//! Word-overlap validation for candidate cross-platform merges.

use std::collections::{BTreeSet, HashSet};

use crate::domain::values::platform::Platform;
use crate::domain::values::similarity_threshold::SimilarityThreshold;

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`. Two empty sets score 0.0, so
/// text with no content words can never confirm a match.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Confirms or rejects key collisions between clusters.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityValidator {
    threshold: SimilarityThreshold,
}

impl SimilarityValidator {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    /// Score two word sets and report whether they clear the threshold.
    pub fn confirm(&self, a: &HashSet<String>, b: &HashSet<String>) -> (bool, f64) {
        let score = jaccard(a, b);
        (self.threshold.accepts(score), score)
    }
}

/// Clusters on overlapping platform sets were already unified by native id
/// where they could be; only disjoint sets are eligible for a text merge.
pub fn is_cross_platform(a: &BTreeSet<Platform>, b: &BTreeSet<Platform>) -> bool {
    a.is_disjoint(b)
}
