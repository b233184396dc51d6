//! Phase A and B: exact native-id grouping and per-group cluster construction.

use std::collections::HashMap;
use std::fmt;

use crate::domain::entities::cluster::Cluster;
use crate::domain::entities::listing::Listing;
use crate::domain::values::platform::Platform;

/// Phase A grouping key. Event ids and per-listing fallbacks are distinct
/// variants, so an event id spelled like `kalshi:X` never joins listing X.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Event(String),
    Listing(Platform, String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Event(event_id) => write!(f, "{event_id}"),
            GroupKey::Listing(platform, native_id) => write!(f, "{platform}:{native_id}"),
        }
    }
}

/// Group key for one listing: its native event id, or the listing itself
/// when it has none.
pub fn group_key(listing: &Listing) -> GroupKey {
    match listing.event_id() {
        Some(event_id) => GroupKey::Event(event_id.to_string()),
        None => GroupKey::Listing(listing.platform, listing.native_id.clone()),
    }
}

/// Partition listings by [`group_key`]. Groups come back in order of first
/// appearance of their key.
pub fn group_native(listings: Vec<Listing>) -> Vec<(GroupKey, Vec<Listing>)> {
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Vec<Listing>)> = Vec::new();

    for listing in listings {
        let key = group_key(&listing);
        match slots.get(&key) {
            Some(&slot) => groups[slot].1.push(listing),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, vec![listing]));
            }
        }
    }

    groups
}

/// One cluster per native group, in group order.
pub fn build_clusters(groups: Vec<(GroupKey, Vec<Listing>)>) -> Vec<Cluster> {
    groups
        .into_iter()
        .filter_map(|(key, members)| Cluster::from_group(key.to_string(), members))
        .collect()
}
