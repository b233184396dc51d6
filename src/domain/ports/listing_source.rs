//! Listing source port: where a clustering run gets its snapshot from.
//!
//! Live deployments implement this over the platform aggregator; the crate
//! ships a JSON file adapter for offline runs and tests. Implementations
//! should skip individual malformed listings and report them in
//! [`SnapshotOutput::errors`] rather than failing the whole snapshot.

use crate::domain::entities::listing::Listing;
use crate::domain::error::DomainError;

/// A loaded snapshot plus per-item problems that did not abort the load.
#[derive(Debug, Default)]
pub struct SnapshotOutput {
    pub listings: Vec<Listing>,
    pub errors: Vec<String>,
}

pub trait ListingSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Load the current snapshot of listings.
    fn fetch(&self) -> Result<SnapshotOutput, DomainError>;
}
