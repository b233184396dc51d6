use serde::{Deserialize, Serialize};

/// Minimum cluster total volume an event needs, per topic tier, before it
/// is worth an alert at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventVolumeGates {
    pub tier_s: f64,
    pub tier_a: f64,
    pub tier_b: f64,
}

impl Default for EventVolumeGates {
    fn default() -> Self {
        Self {
            tier_s: 100_000.0,
            tier_a: 250_000.0,
            tier_b: 500_000.0,
        }
    }
}

impl EventVolumeGates {
    pub fn new(tier_s: f64, tier_a: f64, tier_b: f64) -> Result<Self, String> {
        for (name, value) in [("S", tier_s), ("A", tier_a), ("B", tier_b)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "Minimum event volume for tier {name} must be a non-negative number, got {value}"
                ));
            }
        }
        Ok(Self { tier_s, tier_a, tier_b })
    }

    /// Events below the S-tier minimum are skipped before any tier is known.
    pub fn floor(&self) -> f64 {
        self.tier_s
    }

    /// Whether `total` clears both the global floor and the tier's own minimum.
    pub fn admits(&self, total: f64, minimum: f64) -> bool {
        total >= self.floor() && total >= minimum
    }
}
