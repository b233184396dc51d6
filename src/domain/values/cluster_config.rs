use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::values::event_volume_gates::EventVolumeGates;
use crate::domain::values::similarity_threshold::SimilarityThreshold;

pub const ENV_SIMILARITY_THRESHOLD: &str = "EVENTCLUSTER_SIMILARITY_THRESHOLD";
pub const ENV_WORKERS: &str = "EVENTCLUSTER_WORKERS";
pub const ENV_PARALLEL_MIN_INPUT: &str = "EVENTCLUSTER_PARALLEL_MIN_INPUT";
pub const ENV_MIN_EVENT_VOLUME_S: &str = "EVENTCLUSTER_MIN_EVENT_VOLUME_S";
pub const ENV_MIN_EVENT_VOLUME_A: &str = "EVENTCLUSTER_MIN_EVENT_VOLUME_A";
pub const ENV_MIN_EVENT_VOLUME_B: &str = "EVENTCLUSTER_MIN_EVENT_VOLUME_B";

/// Below this many native groups, key extraction stays on the calling thread.
pub const DEFAULT_PARALLEL_MIN_INPUT: usize = 2000;

/// Tunables consumed by a clustering run. Owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterConfig {
    pub similarity_threshold: SimilarityThreshold,
    /// Worker threads for key extraction. Always at least 1.
    pub workers: usize,
    /// Minimum number of native groups before key extraction fans out.
    pub parallel_min_input: usize,
    /// Per-topic-tier event volume minimums applied when picking an alert tier.
    pub event_volume_gates: EventVolumeGates,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: SimilarityThreshold::default(),
            workers: default_workers(),
            parallel_min_input: DEFAULT_PARALLEL_MIN_INPUT,
            event_volume_gates: EventVolumeGates::default(),
        }
    }
}

impl ClusterConfig {
    /// Defaults overridden by `EVENTCLUSTER_*` environment variables.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClusterConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SIMILARITY_THRESHOLD) {
            let value: f64 = raw.trim().parse().map_err(|_| {
                DomainError::Config(format!("{ENV_SIMILARITY_THRESHOLD} is not a number: {raw}"))
            })?;
            config.similarity_threshold =
                SimilarityThreshold::new(value).map_err(DomainError::Config)?;
        }

        if let Some(raw) = lookup(ENV_WORKERS) {
            let workers: usize = raw.trim().parse().map_err(|_| {
                DomainError::Config(format!("{ENV_WORKERS} is not a positive integer: {raw}"))
            })?;
            config = config.with_workers(workers)?;
        }

        if let Some(raw) = lookup(ENV_PARALLEL_MIN_INPUT) {
            config.parallel_min_input = raw.trim().parse().map_err(|_| {
                DomainError::Config(format!("{ENV_PARALLEL_MIN_INPUT} is not an integer: {raw}"))
            })?;
        }

        let gates = config.event_volume_gates;
        config.event_volume_gates = EventVolumeGates::new(
            volume_var(&lookup, ENV_MIN_EVENT_VOLUME_S)?.unwrap_or(gates.tier_s),
            volume_var(&lookup, ENV_MIN_EVENT_VOLUME_A)?.unwrap_or(gates.tier_a),
            volume_var(&lookup, ENV_MIN_EVENT_VOLUME_B)?.unwrap_or(gates.tier_b),
        )
        .map_err(DomainError::Config)?;

        Ok(config)
    }

    pub fn with_threshold(mut self, value: f64) -> Result<Self, DomainError> {
        self.similarity_threshold = SimilarityThreshold::new(value).map_err(DomainError::Config)?;
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> Result<Self, DomainError> {
        if workers == 0 {
            return Err(DomainError::Config("workers must be at least 1".into()));
        }
        self.workers = workers;
        Ok(self)
    }

    pub fn with_event_volume_gates(mut self, gates: EventVolumeGates) -> Self {
        self.event_volume_gates = gates;
        self
    }

    /// Whether key extraction over `groups` native groups should use the worker pool.
    pub fn should_parallelize(&self, groups: usize) -> bool {
        self.workers > 1 && groups >= self.parallel_min_input
    }
}

fn volume_var<F>(lookup: &F, key: &str) -> Result<Option<f64>, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| DomainError::Config(format!("{key} is not a number: {raw}")))
        })
        .transpose()
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClusterConfig::from_lookup(|_| None).unwrap();
        assert!((config.similarity_threshold.value() - 0.35).abs() < f64::EPSILON);
        assert!(config.workers >= 1);
        assert_eq!(config.parallel_min_input, DEFAULT_PARALLEL_MIN_INPUT);
        assert_eq!(config.event_volume_gates, EventVolumeGates::default());
    }

    #[test]
    fn test_event_volume_gates_from_env() {
        let config = ClusterConfig::from_lookup(lookup_from(&[
            (ENV_MIN_EVENT_VOLUME_S, "50000"),
            (ENV_MIN_EVENT_VOLUME_B, "1000000"),
        ]))
        .unwrap();
        assert_eq!(config.event_volume_gates.tier_s, 50_000.0);
        assert_eq!(config.event_volume_gates.tier_a, 250_000.0);
        assert_eq!(config.event_volume_gates.tier_b, 1_000_000.0);

        let bad = ClusterConfig::from_lookup(lookup_from(&[(ENV_MIN_EVENT_VOLUME_A, "-5")]));
        assert!(matches!(bad, Err(DomainError::Config(_))));
        let garbage = ClusterConfig::from_lookup(lookup_from(&[(ENV_MIN_EVENT_VOLUME_S, "lots")]));
        assert!(matches!(garbage, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClusterConfig::from_lookup(lookup_from(&[
            (ENV_SIMILARITY_THRESHOLD, "0.85"),
            (ENV_WORKERS, "4"),
            (ENV_PARALLEL_MIN_INPUT, "10"),
        ]))
        .unwrap();
        assert!((config.similarity_threshold.value() - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.workers, 4);
        assert_eq!(config.parallel_min_input, 10);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let bad_threshold = ClusterConfig::from_lookup(lookup_from(&[(ENV_SIMILARITY_THRESHOLD, "2")]));
        assert!(matches!(bad_threshold, Err(DomainError::Config(_))));

        let zero_workers = ClusterConfig::from_lookup(lookup_from(&[(ENV_WORKERS, "0")]));
        assert!(matches!(zero_workers, Err(DomainError::Config(_))));

        let garbage = ClusterConfig::from_lookup(lookup_from(&[(ENV_PARALLEL_MIN_INPUT, "lots")]));
        assert!(matches!(garbage, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_should_parallelize() {
        let config = ClusterConfig {
            similarity_threshold: SimilarityThreshold::default(),
            workers: 4,
            parallel_min_input: 100,
            event_volume_gates: EventVolumeGates::default(),
        };
        assert!(!config.should_parallelize(99));
        assert!(config.should_parallelize(100));

        let single = ClusterConfig { workers: 1, ..config };
        assert!(!single.should_parallelize(10_000));
    }
}
