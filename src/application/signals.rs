//! Per-event signals computed from a finished cluster.
//!
//! Historic volumes come from the caller (usually persisted snapshots of
//! earlier runs) as a separate [`VolumeHistory`]; the cluster and its
//! listings are only read.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::cluster::Cluster;
use crate::domain::values::event_volume_gates::EventVolumeGates;

pub const HIGH_VOLUME_EVENT: f64 = 500_000.0;
pub const DAILY_VOLUME_FLOOR: f64 = 250_000.0;
pub const ACTIVE_EVENT_MARKETS: usize = 5;
pub const EVENT_PROXIMITY_DAYS: i64 = 7;

/// Cluster volume observed by earlier runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeHistory {
    pub one_hour_ago: Option<f64>,
    pub six_hours_ago: Option<f64>,
}

/// Topic importance as rated by the relevance classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicTier {
    S,
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTier {
    Urgent,
    Daily,
    Background,
}

impl fmt::Display for AlertTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTier::Urgent => write!(f, "urgent"),
            AlertTier::Daily => write!(f, "daily"),
            AlertTier::Background => write!(f, "background"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterSignals {
    pub triggered: Vec<String>,
    /// `(now - 1h) / 1h`, as a fraction (1.0 = +100%).
    pub volume_growth: Option<f64>,
    pub event_proximity_days: Option<i64>,
}

impl ClusterSignals {
    pub fn has(&self, signal: &str) -> bool {
        self.triggered.iter().any(|s| s == signal)
    }
}

/// Evaluate all cluster-level triggers.
pub fn evaluate(cluster: &Cluster, history: &VolumeHistory, now: DateTime<Utc>) -> ClusterSignals {
    let mut signals = ClusterSignals::default();
    let total = cluster.total_volume();

    if let Some(growth) = growth(total, history.one_hour_ago) {
        signals.volume_growth = Some(growth);
        if growth > 3.0 {
            signals.triggered.push("volume_spike_300_1h".into());
        } else if growth > 1.0 {
            signals.triggered.push("volume_spike_100_1h".into());
        }
    }

    if let Some(growth_6h) = growth(total, history.six_hours_ago) {
        if growth_6h > 2.0 {
            signals.triggered.push("sustained_growth_6h".into());
        }
    }

    if let Some(event_date) = cluster.primary.event_date {
        let days = (event_date - now).num_seconds().div_euclid(86_400);
        signals.event_proximity_days = Some(days);
        if (0..=EVENT_PROXIMITY_DAYS).contains(&days) {
            signals.triggered.push(format!("event_in_{days}_days"));
        }
    }

    if total >= HIGH_VOLUME_EVENT {
        signals.triggered.push("high_volume_event".into());
    }
    if cluster.is_multi_platform() {
        signals.triggered.push("multi_platform".into());
    }
    if cluster.market_count() >= ACTIVE_EVENT_MARKETS {
        signals.triggered.push("active_event".into());
    }

    signals
}

/// Minimum cluster total volume for an event rated `topic`.
pub fn min_event_volume(gates: &EventVolumeGates, topic: TopicTier) -> f64 {
    match topic {
        TopicTier::S => gates.tier_s,
        TopicTier::A => gates.tier_a,
        TopicTier::B => gates.tier_b,
    }
}

/// Map signals and topic tier onto an alert tier. `None` when the cluster's
/// total volume is below the minimum for its topic tier; such events are
/// not alerted on at any tier.
pub fn alert_tier(
    cluster: &Cluster,
    signals: &ClusterSignals,
    topic: TopicTier,
    gates: &EventVolumeGates,
) -> Option<AlertTier> {
    if !gates.admits(cluster.total_volume(), min_event_volume(gates, topic)) {
        return None;
    }
    Some(tier_for(cluster, signals, topic))
}

fn tier_for(cluster: &Cluster, signals: &ClusterSignals, topic: TopicTier) -> AlertTier {
    if signals.has("volume_spike_300_1h") {
        return AlertTier::Urgent;
    }
    if topic == TopicTier::S
        && ["volume_spike_100_1h", "event_in_0_days", "event_in_1_days"]
            .iter()
            .any(|s| signals.has(s))
    {
        return AlertTier::Urgent;
    }

    if ["sustained_growth_6h", "high_volume_event", "multi_platform"]
        .iter()
        .any(|s| signals.has(s))
    {
        return AlertTier::Daily;
    }
    if signals
        .event_proximity_days
        .is_some_and(|d| d <= EVENT_PROXIMITY_DAYS)
    {
        return AlertTier::Daily;
    }
    if cluster.total_volume() >= DAILY_VOLUME_FLOOR && matches!(topic, TopicTier::S | TopicTier::A) {
        return AlertTier::Daily;
    }

    AlertTier::Background
}

fn growth(current: f64, previous: Option<f64>) -> Option<f64> {
    previous
        .filter(|p| *p > 0.0)
        .map(|p| (current - p) / p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::listing::Listing;
    use crate::domain::values::platform::Platform;
    use chrono::Duration;

    fn single(volume: f64) -> Cluster {
        let listing = Listing::new(Platform::Kalshi, "K1", "Fed cuts rates", volume);
        Cluster::from_group(listing.listing_key(), vec![listing]).unwrap()
    }

    #[test]
    fn test_volume_spike_300() {
        let cluster = single(600_000.0);
        let history = VolumeHistory { one_hour_ago: Some(100_000.0), six_hours_ago: None };
        let signals = evaluate(&cluster, &history, Utc::now());
        assert!(signals.has("volume_spike_300_1h"));
        assert!(!signals.has("volume_spike_100_1h"));
        assert!((signals.volume_growth.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(
            alert_tier(&cluster, &signals, TopicTier::B, &EventVolumeGates::default()),
            Some(AlertTier::Urgent)
        );
    }

    #[test]
    fn test_zero_history_is_ignored() {
        let signals = evaluate(
            &single(1_000.0),
            &VolumeHistory { one_hour_ago: Some(0.0), six_hours_ago: Some(0.0) },
            Utc::now(),
        );
        assert!(signals.volume_growth.is_none());
        assert!(signals.triggered.is_empty());
    }

    #[test]
    fn test_high_volume_is_daily() {
        let cluster = single(600_000.0);
        let signals = evaluate(&cluster, &VolumeHistory::default(), Utc::now());
        assert_eq!(signals.triggered, vec!["high_volume_event"]);
        assert_eq!(
            alert_tier(&cluster, &signals, TopicTier::B, &EventVolumeGates::default()),
            Some(AlertTier::Daily)
        );
    }

    #[test]
    fn test_event_proximity() {
        let now = Utc::now();
        let listing = Listing::new(Platform::Kalshi, "K1", "Game", 600_000.0)
            .with_event_date(now + Duration::hours(30));
        let cluster = Cluster::from_group("k".into(), vec![listing]).unwrap();
        let signals = evaluate(&cluster, &VolumeHistory::default(), now);
        assert_eq!(signals.event_proximity_days, Some(1));
        assert!(signals.has("event_in_1_days"));
        let gates = EventVolumeGates::default();
        assert_eq!(alert_tier(&cluster, &signals, TopicTier::S, &gates), Some(AlertTier::Urgent));
        assert_eq!(alert_tier(&cluster, &signals, TopicTier::B, &gates), Some(AlertTier::Daily));
    }

    #[test]
    fn test_past_event_is_not_proximate() {
        let now = Utc::now();
        let listing = Listing::new(Platform::Kalshi, "K1", "Game", 10.0)
            .with_event_date(now - Duration::hours(2));
        let cluster = Cluster::from_group("k".into(), vec![listing]).unwrap();
        let signals = evaluate(&cluster, &VolumeHistory::default(), now);
        assert_eq!(signals.event_proximity_days, Some(-1));
        assert!(signals.triggered.is_empty());
    }

    #[test]
    fn test_min_event_volume_per_topic() {
        let gates = EventVolumeGates::default();
        assert_eq!(min_event_volume(&gates, TopicTier::S), 100_000.0);
        assert_eq!(min_event_volume(&gates, TopicTier::A), 250_000.0);
        assert_eq!(min_event_volume(&gates, TopicTier::B), 500_000.0);
    }

    #[test]
    fn test_below_topic_minimum_gets_no_tier() {
        let gates = EventVolumeGates::default();
        let cluster = single(300_000.0);
        let signals = evaluate(&cluster, &VolumeHistory::default(), Utc::now());
        assert_eq!(alert_tier(&cluster, &signals, TopicTier::B, &gates), None);
        assert_eq!(alert_tier(&cluster, &signals, TopicTier::A, &gates), Some(AlertTier::Daily));
        assert_eq!(alert_tier(&cluster, &signals, TopicTier::S, &gates), Some(AlertTier::Daily));
    }

    #[test]
    fn test_spike_does_not_bypass_minimum() {
        let cluster = single(50_000.0);
        let history = VolumeHistory { one_hour_ago: Some(10_000.0), six_hours_ago: None };
        let signals = evaluate(&cluster, &history, Utc::now());
        assert!(signals.has("volume_spike_300_1h"));
        assert_eq!(
            alert_tier(&cluster, &signals, TopicTier::S, &EventVolumeGates::default()),
            None
        );
    }

    #[test]
    fn test_background_above_minimum_without_signals() {
        let cluster = single(150_000.0);
        let signals = evaluate(&cluster, &VolumeHistory::default(), Utc::now());
        assert_eq!(
            alert_tier(&cluster, &signals, TopicTier::S, &EventVolumeGates::default()),
            Some(AlertTier::Background)
        );
    }

    #[test]
    fn test_floor_applies_even_when_tier_minimum_is_lower() {
        let gates = EventVolumeGates::new(100_000.0, 250_000.0, 10_000.0).unwrap();
        let cluster = single(50_000.0);
        let signals = evaluate(&cluster, &VolumeHistory::default(), Utc::now());
        assert_eq!(alert_tier(&cluster, &signals, TopicTier::B, &gates), None);
    }
}
