//! Shared test helpers.
#![allow(dead_code)]

use eventcluster::domain::entities::cluster::Cluster;
use eventcluster::domain::entities::listing::Listing;
use eventcluster::domain::values::cluster_config::ClusterConfig;
use eventcluster::domain::values::platform::Platform;
use eventcluster::EventClusterer;
use std::collections::HashMap;

pub fn setup() -> EventClusterer {
    EventClusterer::with_config(config(1, usize::MAX))
}

pub fn config(workers: usize, parallel_min_input: usize) -> ClusterConfig {
    ClusterConfig {
        workers,
        parallel_min_input,
        ..ClusterConfig::default()
    }
}

pub fn kalshi(id: &str, event_id: Option<&str>, title: &str, volume: f64) -> Listing {
    let listing = Listing::new(Platform::Kalshi, id, title, volume);
    match event_id {
        Some(ev) => listing.with_event_id(ev),
        None => listing,
    }
}

pub fn polymarket(id: &str, event_id: Option<&str>, title: &str, volume: f64) -> Listing {
    let listing = Listing::new(Platform::Polymarket, id, title, volume);
    match event_id {
        Some(ev) => listing.with_event_id(ev),
        None => listing,
    }
}

/// The three-listing snapshot from the Lakers/Celtics + NYC snowfall scenario.
pub fn scenario_a() -> Vec<Listing> {
    vec![
        kalshi("A1", Some("ev1"), "Will the Lakers beat the Celtics?", 10_000.0),
        polymarket("P1", None, "Lakers vs Celtics - Who wins?", 8_000.0),
        kalshi("A2", Some("ev2"), "NYC snowfall over 30 inches?", 500_000.0),
    ]
}

/// `(platform, native_id)` → index of the cluster that holds it.
pub fn membership(clusters: &[Cluster]) -> HashMap<(Platform, String), usize> {
    let mut seen = HashMap::new();
    for (i, cluster) in clusters.iter().enumerate() {
        for listing in cluster.members() {
            let previous = seen.insert((listing.platform, listing.native_id.clone()), i);
            assert!(previous.is_none(), "{} appears in more than one cluster", listing.native_id);
        }
    }
    seen
}

/// A mixed snapshot with sports, politics and weather markets on both platforms.
pub fn mixed_snapshot() -> Vec<Listing> {
    vec![
        kalshi("KXNBA-LAL-BOS-1", Some("KXNBA-LAL-BOS"), "Lakers vs Celtics winner", 120_000.0),
        kalshi("KXNBA-LAL-BOS-2", Some("KXNBA-LAL-BOS"), "Lakers vs Celtics total points over 220", 40_000.0),
        polymarket("0xaaa", Some("nba-lakers-celtics"), "Celtics vs Lakers", 90_000.0),
        kalshi("KXFED-25MAR", Some("KXFED"), "Will the Federal Reserve cut rates in March 2025?", 300_000.0),
        polymarket("0xbbb", None, "Federal Reserve rate cut in March?", 250_000.0),
        kalshi("KXHIGHNY-1", Some("KXHIGHNY"), "Highest temperature in NYC today", 15_000.0),
        kalshi("KXHIGHNY-2", Some("KXHIGHNY"), "Highest temperature in NYC today above 80", 9_000.0),
        polymarket("0xccc", None, "Will Taylor Swift announce a new album?", 70_000.0),
        polymarket("0xddd", None, "", 1_000.0),
        kalshi("KXBTC-1", None, "Bitcoin above 100k on Friday?", 500_000.0),
    ]
}
