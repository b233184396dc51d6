use crate::domain::values::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One tradeable market on one platform, as handed over by the aggregator.
///
/// The clustering engine only ever reads a `Listing`; it never writes back
/// onto one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub platform: Platform,
    /// Platform-scoped market id (Kalshi ticker, Polymarket condition id).
    pub native_id: String,
    /// Platform-local grouping key, e.g. a Kalshi series/event ticker or a
    /// Polymarket group id.
    #[serde(default)]
    pub native_event_id: Option<String>,
    #[serde(default)]
    pub event_title: Option<String>,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub event_date: Option<DateTime<Utc>>,
    /// Platform response the listing was built from. Opaque to the engine.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Listing {
    pub fn new(platform: Platform, native_id: impl Into<String>, title: impl Into<String>, volume: f64) -> Self {
        Self {
            platform,
            native_id: native_id.into(),
            native_event_id: None,
            event_title: None,
            title: title.into(),
            subtitle: None,
            volume,
            event_date: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.native_event_id = Some(event_id.into());
        self
    }

    pub fn with_event_title(mut self, event_title: impl Into<String>) -> Self {
        self.event_title = Some(event_title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_event_date(mut self, event_date: DateTime<Utc>) -> Self {
        self.event_date = Some(event_date);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Native event id, if present and not blank.
    pub fn event_id(&self) -> Option<&str> {
        non_blank(self.native_event_id.as_deref())
    }

    pub fn event_title(&self) -> Option<&str> {
        non_blank(self.event_title.as_deref())
    }

    pub fn subtitle(&self) -> Option<&str> {
        non_blank(self.subtitle.as_deref())
    }

    /// Volume used for ordering and totals. Negative or NaN volumes count as zero.
    pub fn counted_volume(&self) -> f64 {
        if self.volume.is_finite() && self.volume > 0.0 {
            self.volume
        } else {
            0.0
        }
    }

    /// Fallback grouping key for listings without a native event id.
    pub fn listing_key(&self) -> String {
        format!("{}:{}", self.platform, self.native_id)
    }
}

/// Descending by volume, then `(platform, native_id)` ascending so ties do not
/// depend on input order.
pub fn by_volume_desc(a: &Listing, b: &Listing) -> Ordering {
    b.counted_volume()
        .total_cmp(&a.counted_volume())
        .then_with(|| a.platform.cmp(&b.platform))
        .then_with(|| a.native_id.cmp(&b.native_id))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
