use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::entities::listing::Listing;
use crate::domain::error::DomainError;
use crate::domain::ports::listing_source::{ListingSource, SnapshotOutput};

/// Reads a snapshot stored as a JSON array of listings.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse snapshot JSON. The outer array must be valid; bad elements are
    /// skipped and reported.
    pub fn parse(raw: &str) -> Result<SnapshotOutput, DomainError> {
        let items: Vec<serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| DomainError::Parse(format!("snapshot is not a JSON array: {e}")))?;

        let mut output = SnapshotOutput::default();
        for (i, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Listing>(item) {
                Ok(listing) => output.listings.push(listing),
                Err(e) => {
                    let msg = format!("listing #{i}: {e}");
                    warn!("Skipping malformed {msg}");
                    output.errors.push(msg);
                }
            }
        }
        Ok(output)
    }
}

impl ListingSource for JsonFileSource {
    fn name(&self) -> &str {
        "json_file"
    }

    fn fetch(&self) -> Result<SnapshotOutput, DomainError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| DomainError::Io(format!("{}: {e}", self.path.display())))?;
        Self::parse(&raw)
    }
}
