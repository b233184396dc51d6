use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplace a listing was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Kalshi,
    Polymarket,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Kalshi => "kalshi",
            Platform::Polymarket => "polymarket",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kalshi" => Ok(Platform::Kalshi),
            "polymarket" => Ok(Platform::Polymarket),
            _ => Err(format!("Unknown platform: {s}")),
        }
    }
}
