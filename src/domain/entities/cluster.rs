use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::entities::listing::{by_volume_desc, Listing};
use crate::domain::values::platform::Platform;

/// A reconstructed real-world event: one or more listings, possibly spanning
/// both platforms.
///
/// `primary` is always the highest-volume member and `related` is kept in
/// descending volume order.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    /// Native event id of the seed group, or `platform:native_id` for listings
    /// that arrived without one.
    pub key: String,
    pub title: String,
    pub primary: Listing,
    pub related: Vec<Listing>,
    pub platforms: BTreeSet<Platform>,
    /// Event title + primary title + primary subtitle of the seed group. Input
    /// to key extraction and similarity scoring.
    pub representative_text: String,
}

impl Cluster {
    /// Build a cluster from one native group. Returns `None` for an empty group.
    pub fn from_group(key: String, mut members: Vec<Listing>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        members.sort_by(by_volume_desc);
        let event_title = first_event_title(&members).map(str::to_string);
        let mut members = members.into_iter();
        let primary = members.next()?;
        let related: Vec<Listing> = members.collect();

        let representative_text = representative_text(event_title.as_deref(), &primary);
        let title = event_title.unwrap_or_else(|| primary.title.clone());
        let platforms = std::iter::once(primary.platform)
            .chain(related.iter().map(|l| l.platform))
            .collect();

        Some(Self {
            key,
            title,
            primary,
            related,
            platforms,
            representative_text,
        })
    }

    /// Combined volume of every member.
    pub fn total_volume(&self) -> f64 {
        self.members().map(Listing::counted_volume).sum()
    }

    pub fn market_count(&self) -> usize {
        1 + self.related.len()
    }

    /// Platforms covering this event, in stable order.
    pub fn platform_spread(&self) -> Vec<Platform> {
        self.platforms.iter().copied().collect()
    }

    pub fn is_multi_platform(&self) -> bool {
        self.platforms.len() > 1
    }

    /// The `n` highest-volume members, primary first.
    pub fn top_markets(&self, n: usize) -> Vec<&Listing> {
        self.members().take(n).collect()
    }

    /// Primary followed by related, in descending volume order.
    pub fn members(&self) -> impl Iterator<Item = &Listing> {
        std::iter::once(&self.primary).chain(self.related.iter())
    }

    /// Take over every listing of `other`. The representative text stays the
    /// seed's; primary, ordering and title are recomputed.
    pub(crate) fn absorb(&mut self, other: Cluster) {
        let mut members: Vec<Listing> = Vec::with_capacity(self.market_count() + other.market_count());
        members.push(self.primary.clone());
        members.append(&mut self.related);
        members.push(other.primary);
        members.extend(other.related);
        members.sort_by(by_volume_desc);

        self.platforms.extend(other.platforms);
        self.title = first_event_title(&members)
            .map(str::to_string)
            .unwrap_or_else(|| members[0].title.clone());

        let mut members = members.into_iter();
        if let Some(primary) = members.next() {
            self.primary = primary;
        }
        self.related = members.collect();
    }

    pub fn summary(&self, top: usize) -> ClusterSummary {
        ClusterSummary {
            key: self.key.clone(),
            title: self.title.clone(),
            total_volume: self.total_volume(),
            market_count: self.market_count(),
            platforms: self.platform_spread(),
            top_markets: self
                .top_markets(top)
                .into_iter()
                .map(|l| MarketSummary {
                    platform: l.platform,
                    native_id: l.native_id.clone(),
                    title: l.title.clone(),
                    volume: l.volume,
                })
                .collect(),
        }
    }
}

/// Compact, serializable view of a cluster for reports.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub key: String,
    pub title: String,
    pub total_volume: f64,
    pub market_count: usize,
    pub platforms: Vec<Platform>,
    pub top_markets: Vec<MarketSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub platform: Platform,
    pub native_id: String,
    pub title: String,
    pub volume: f64,
}

fn first_event_title(members: &[Listing]) -> Option<&str> {
    members.iter().find_map(Listing::event_title)
}

fn representative_text(event_title: Option<&str>, primary: &Listing) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if let Some(event_title) = event_title {
        parts.push(event_title);
    }
    parts.push(primary.title.as_str());
    if let Some(subtitle) = primary.subtitle() {
        parts.push(subtitle);
    }
    parts.join(" ")
}
