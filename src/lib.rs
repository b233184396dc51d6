pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::cluster_markets::{ClusterMarketsUseCase, ClusterScan};
use crate::application::clustering::keys::KeyProfile;
use crate::application::clustering::similarity::jaccard;
use crate::application::clustering::text::similarity_words;
use crate::application::signals::{self, AlertTier, ClusterSignals, TopicTier, VolumeHistory};
use crate::domain::entities::cluster::Cluster;
use crate::domain::entities::listing::Listing;
use crate::domain::error::DomainError;
use crate::domain::ports::listing_source::ListingSource;
use crate::domain::values::cluster_config::ClusterConfig;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

pub struct EventClusterer {
    cluster_uc: ClusterMarketsUseCase,
    in_flight: AtomicBool,
}

impl EventClusterer {
    /// Configuration from `EVENTCLUSTER_*` environment variables.
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self::with_config(ClusterConfig::from_env()?))
    }

    pub fn with_config(config: ClusterConfig) -> Self {
        Self {
            cluster_uc: ClusterMarketsUseCase::new(config),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        self.cluster_uc.config()
    }

    /// Cluster a snapshot and return the clusters, largest total volume first.
    pub fn cluster(&self, listings: Vec<Listing>) -> Vec<Cluster> {
        self.cluster_uc.execute(listings, None).clusters
    }

    pub fn scan(&self, listings: Vec<Listing>, min_volume: Option<f64>) -> ClusterScan {
        self.cluster_uc.execute(listings, min_volume)
    }

    pub fn scan_source(
        &self,
        source: &dyn ListingSource,
        min_volume: Option<f64>,
    ) -> Result<ClusterScan, DomainError> {
        self.cluster_uc.execute_from(source, min_volume)
    }

    /// Scheduled check entry point. Returns `Ok(None)` without doing any work
    /// when another check is still running; the trigger is dropped.
    pub fn run_check(
        &self,
        source: &dyn ListingSource,
        min_volume: Option<f64>,
    ) -> Result<Option<ClusterScan>, DomainError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!(source = source.name(), "previous check still running, skipping");
            return Ok(None);
        };
        self.scan_source(source, min_volume).map(Some)
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Keys and similarity words a text would contribute to a run.
    pub fn explain(&self, text: &str) -> KeyProfile {
        KeyProfile::from_text(text)
    }

    /// Jaccard similarity two texts would score in the merge phase.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        jaccard(&similarity_words(a), &similarity_words(b))
    }

    pub fn signals(&self, cluster: &Cluster, history: &VolumeHistory) -> ClusterSignals {
        signals::evaluate(cluster, history, Utc::now())
    }

    /// Alert tier under the configured per-topic event volume minimums;
    /// `None` when the cluster is too small for `topic`.
    pub fn alert_tier(
        &self,
        cluster: &Cluster,
        cluster_signals: &ClusterSignals,
        topic: TopicTier,
    ) -> Option<AlertTier> {
        signals::alert_tier(cluster, cluster_signals, topic, &self.config().event_volume_gates)
    }
}

/// Clears the in-flight flag when dropped, including on early return.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
