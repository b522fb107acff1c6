//! Top-level catalog index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Index entry pointing at one channel's snapshot directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogIndexEntry {
    pub id: String,
    pub scraped_at: DateTime<Utc>,
    /// Snapshot directory for this channel, relative to the invocation.
    pub path: String,
}

/// The whole catalog index, read-modify-written on every run.
///
/// Holds at most one entry per channel id; a re-scrape replaces the previous
/// entry rather than appending a duplicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogIndex {
    #[serde(default)]
    pub channels: Vec<CatalogIndexEntry>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CatalogIndex {
    /// Look up the entry for a channel id.
    pub fn entry(&self, id: &str) -> Option<&CatalogIndexEntry> {
        self.channels.iter().find(|entry| entry.id == id)
    }
}
