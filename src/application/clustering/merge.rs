//! Phase D: inverted-index merge of cross-platform clusters.
//!
//! Clusters live in a run-scoped arena and are referred to by [`ClusterId`].
//! The key index maps every extracted key to the ids that produced it. Seeds
//! are visited in descending total volume; each unconsumed seed looks up its
//! own keys once, validates every cross-platform candidate and absorbs all
//! confirmed ones in a single step.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::keys::KeyProfile;
use super::similarity::{is_cross_platform, SimilarityValidator};
use crate::domain::entities::cluster::Cluster;

/// Handle into the merge arena. Equal ids mean the same Phase-B cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(usize);

/// key → ids of the clusters that produced it.
#[derive(Debug, Default)]
pub struct KeyIndex {
    postings: HashMap<String, BTreeSet<ClusterId>>,
}

impl KeyIndex {
    pub fn build(profiles: &[KeyProfile]) -> Self {
        let mut postings: HashMap<String, BTreeSet<ClusterId>> = HashMap::new();
        for (i, profile) in profiles.iter().enumerate() {
            for key in &profile.keys {
                postings.entry(key.clone()).or_default().insert(ClusterId(i));
            }
        }
        Self { postings }
    }

    /// Every id sharing at least one of `keys`, in ascending id order.
    pub fn candidates(&self, keys: &[String]) -> BTreeSet<ClusterId> {
        keys.iter()
            .filter_map(|k| self.postings.get(k))
            .flatten()
            .copied()
            .collect()
    }
}

/// Result of Phase D.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Final clusters, sorted by total volume descending.
    pub clusters: Vec<Cluster>,
    /// Number of clusters absorbed into a seed.
    pub merges: usize,
}

pub struct MergeEngine {
    validator: SimilarityValidator,
}

impl MergeEngine {
    pub fn new(validator: SimilarityValidator) -> Self {
        Self { validator }
    }

    /// Merge `clusters` using `profiles[i]` as the key profile of `clusters[i]`.
    pub fn merge(&self, clusters: Vec<Cluster>, profiles: &[KeyProfile]) -> MergeOutcome {
        debug_assert_eq!(clusters.len(), profiles.len());

        let index = KeyIndex::build(profiles);
        let mut arena: Vec<Option<Cluster>> = clusters.into_iter().map(Some).collect();
        let mut merges = 0usize;

        for seed in seed_order(&arena) {
            let Some(seed_platforms) = arena[seed.0].as_ref().map(|c| c.platforms.clone()) else {
                continue;
            };
            let seed_profile = &profiles[seed.0];

            let mut confirmed: Vec<ClusterId> = Vec::new();
            for candidate in index.candidates(&seed_profile.keys) {
                if candidate == seed {
                    continue;
                }
                let Some(other) = arena[candidate.0].as_ref() else {
                    continue;
                };
                if !is_cross_platform(&seed_platforms, &other.platforms) {
                    continue;
                }
                let (accepted, score) = self
                    .validator
                    .confirm(&seed_profile.words, &profiles[candidate.0].words);
                debug!(
                    seed = %seed_key(&arena, seed),
                    candidate = %other.key,
                    score,
                    accepted,
                    "validated key collision"
                );
                if accepted {
                    confirmed.push(candidate);
                }
            }

            for candidate in confirmed {
                let Some(absorbed) = arena[candidate.0].take() else {
                    continue;
                };
                if let Some(seed_cluster) = arena[seed.0].as_mut() {
                    seed_cluster.absorb(absorbed);
                    merges += 1;
                }
            }
        }

        let mut clusters: Vec<Cluster> = arena.into_iter().flatten().collect();
        clusters.sort_by(|a, b| b.total_volume().total_cmp(&a.total_volume()));

        MergeOutcome { clusters, merges }
    }
}

/// Arena ids by descending total volume; equal volumes keep insertion order.
fn seed_order(arena: &[Option<Cluster>]) -> Vec<ClusterId> {
    let volumes: Vec<f64> = arena
        .iter()
        .map(|c| c.as_ref().map_or(0.0, Cluster::total_volume))
        .collect();
    let mut order: Vec<ClusterId> = (0..arena.len()).map(ClusterId).collect();
    order.sort_by(|a, b| volumes[b.0].total_cmp(&volumes[a.0]));
    order
}

fn seed_key(arena: &[Option<Cluster>], id: ClusterId) -> &str {
    arena[id.0].as_ref().map_or("", |c| c.key.as_str())
}
