//! Cluster-markets use case: one clustering run over a listing snapshot,
//! reported as a [`ClusterScan`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::application::clustering::ClusteringEngine;
use crate::domain::entities::cluster::Cluster;
use crate::domain::entities::listing::Listing;
use crate::domain::error::DomainError;
use crate::domain::ports::listing_source::ListingSource;
use crate::domain::values::cluster_config::ClusterConfig;

/// Result of one clustering run.
#[derive(Debug, Serialize)]
pub struct ClusterScan {
    pub scan_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub listings_received: usize,
    /// Listings left after the minimum-volume gate.
    pub listings_clustered: usize,
    pub native_groups: usize,
    pub unkeyable_groups: usize,
    pub merges: usize,
    pub parallel_keys: bool,
    pub total_clusters: usize,
    pub elapsed_ms: u128,
    /// Snapshot items skipped while loading, if loaded through a source.
    pub snapshot_errors: Vec<String>,
    pub clusters: Vec<Cluster>,
}

pub struct ClusterMarketsUseCase {
    engine: ClusteringEngine,
}

impl ClusterMarketsUseCase {
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            engine: ClusteringEngine::new(config),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        self.engine.config()
    }

    /// Cluster `listings`, dropping any below `min_volume` first.
    pub fn execute(&self, listings: Vec<Listing>, min_volume: Option<f64>) -> ClusterScan {
        let started = Instant::now();
        let scanned_at = Utc::now();
        let scan_id = Uuid::new_v4();

        let listings_received = listings.len();
        let viable: Vec<Listing> = match min_volume {
            Some(min) => listings
                .into_iter()
                .filter(|l| l.counted_volume() >= min)
                .collect(),
            None => listings,
        };
        let listings_clustered = viable.len();
        info!(%scan_id, listings_received, listings_clustered, "clustering snapshot");

        let run = self.engine.run(viable);
        let elapsed_ms = started.elapsed().as_millis();

        info!(
            %scan_id,
            clusters = run.clusters.len(),
            native_groups = run.stats.native_groups,
            merges = run.stats.merges,
            unkeyable = run.stats.unkeyable_groups,
            parallel = run.stats.parallel_keys,
            elapsed_ms = elapsed_ms as u64,
            "clustering complete"
        );

        ClusterScan {
            scan_id,
            scanned_at,
            listings_received,
            listings_clustered,
            native_groups: run.stats.native_groups,
            unkeyable_groups: run.stats.unkeyable_groups,
            merges: run.stats.merges,
            parallel_keys: run.stats.parallel_keys,
            total_clusters: run.clusters.len(),
            elapsed_ms,
            snapshot_errors: Vec::new(),
            clusters: run.clusters,
        }
    }

    /// Load a snapshot from `source` and cluster it.
    pub fn execute_from(
        &self,
        source: &dyn ListingSource,
        min_volume: Option<f64>,
    ) -> Result<ClusterScan, DomainError> {
        let snapshot = source.fetch()?;
        info!(
            source = source.name(),
            listings = snapshot.listings.len(),
            skipped = snapshot.errors.len(),
            "snapshot loaded"
        );
        let mut scan = self.execute(snapshot.listings, min_volume);
        scan.snapshot_errors = snapshot.errors;
        Ok(scan)
    }
}
