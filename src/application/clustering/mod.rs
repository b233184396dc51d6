//! Event clustering engine.
//!
//! Partitions a snapshot of listings into events in four phases:
//!
//! - **A** group listings by native event id ([`grouping`])
//! - **B** build one cluster and representative text per group
//! - **C** extract lookup keys and similarity words per cluster ([`keys`]),
//!   fanned out over a worker pool for large inputs
//! - **D** merge confirmed cross-platform key collisions ([`merge`])
//!
//! The engine is pure and holds no state between runs.

pub mod grouping;
pub mod keys;
pub mod merge;
pub mod similarity;
pub mod text;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::entities::cluster::Cluster;
use crate::domain::entities::listing::Listing;
use crate::domain::values::cluster_config::ClusterConfig;
use keys::KeyProfile;
use merge::MergeEngine;
use similarity::SimilarityValidator;

/// Counters describing one clustering run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub listings: usize,
    pub native_groups: usize,
    pub unkeyable_groups: usize,
    pub merges: usize,
    pub parallel_keys: bool,
}

#[derive(Debug)]
pub struct ClusterRun {
    pub clusters: Vec<Cluster>,
    pub stats: RunStats,
}

pub struct ClusteringEngine {
    config: ClusterConfig,
}

impl ClusteringEngine {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Cluster a full snapshot. Every listing ends up in exactly one cluster.
    pub fn run(&self, listings: Vec<Listing>) -> ClusterRun {
        let listing_count = listings.len();

        // Phase A + B
        let clusters = grouping::build_clusters(grouping::group_native(listings));
        let native_groups = clusters.len();
        debug!(listings = listing_count, native_groups, "native grouping done");

        // Phase C
        let parallel = self.config.should_parallelize(native_groups);
        let profiles = if parallel {
            self.profiles_parallel(&clusters)
        } else {
            profiles_sequential(&clusters)
        };
        let unkeyable_groups = profiles.iter().filter(|p| p.is_unkeyable()).count();
        debug!(unkeyable_groups, parallel, "key extraction done");

        // Phase D
        let engine = MergeEngine::new(SimilarityValidator::new(self.config.similarity_threshold));
        let outcome = engine.merge(clusters, &profiles);

        ClusterRun {
            clusters: outcome.clusters,
            stats: RunStats {
                listings: listing_count,
                native_groups,
                unkeyable_groups,
                merges: outcome.merges,
                parallel_keys: parallel,
            },
        }
    }

    /// Key extraction on a run-scoped pool. Results keep cluster order.
    fn profiles_parallel(&self, clusters: &[Cluster]) -> Vec<KeyProfile> {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
        {
            Ok(pool) => pool.install(|| {
                clusters
                    .par_iter()
                    .map(|c| KeyProfile::from_text(&c.representative_text))
                    .collect()
            }),
            Err(e) => {
                warn!(error = %e, "worker pool unavailable, extracting keys sequentially");
                profiles_sequential(clusters)
            }
        }
    }
}

fn profiles_sequential(clusters: &[Cluster]) -> Vec<KeyProfile> {
    clusters
        .iter()
        .map(|c| KeyProfile::from_text(&c.representative_text))
        .collect()
}

/// Convenience wrapper: cluster `listings` with `config` and return only the clusters.
pub fn cluster_listings(listings: Vec<Listing>, config: &ClusterConfig) -> Vec<Cluster> {
    ClusteringEngine::new(config.clone()).run(listings).clusters
}
