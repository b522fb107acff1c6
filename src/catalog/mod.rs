//! On-disk catalog: per-channel snapshots plus a deduplicating index.
//!
//! Layout:
//! `{root}/{id}/identity.json` - channel identity snapshot
//! `{root}/{id}/collection.json` - recent/popular listings
//! `{root}/index.json` - one entry per channel id, last scrape wins
//!
//! The index merge is read-filter-append-write and assumes a single runner
//! at a time. The index is only touched after both snapshots are on disk, so
//! an aborted run can leave the index missing this run's entry but never
//! pointing at missing files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::models::{CatalogIndex, CatalogIndexEntry, ChannelIdentity, MediaCollection};

pub const IDENTITY_FILE: &str = "identity.json";
pub const COLLECTION_FILE: &str = "collection.json";
pub const INDEX_FILE: &str = "index.json";

/// Handle on the catalog root directory.
pub struct CatalogStore {
    root: PathBuf,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot directory for one channel.
    pub fn channel_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Persist a scrape run: both snapshots, then the index merge.
    ///
    /// Every step is idempotent; re-persisting the same identity overwrites
    /// its snapshots and replaces its index entry. Any I/O failure is fatal
    /// for the run. Returns the channel's snapshot directory.
    pub fn persist(
        &self,
        identity: &ChannelIdentity,
        collection: &MediaCollection,
    ) -> Result<PathBuf, ScrapeError> {
        let dir = self.channel_dir(&identity.id);
        fs::create_dir_all(&dir)?;

        write_json(&dir.join(IDENTITY_FILE), identity)?;
        write_json(&dir.join(COLLECTION_FILE), collection)?;

        self.merge_index(identity)?;
        info!(id = %identity.id, dir = %dir.display(), "catalog updated");
        Ok(dir)
    }

    /// Read the index, treating an absent file as an empty index.
    pub fn load_index(&self) -> Result<CatalogIndex, ScrapeError> {
        let path = self.root.join(INDEX_FILE);
        if !path.exists() {
            return Ok(CatalogIndex::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace any existing entry for this identity and append the new one.
    fn merge_index(&self, identity: &ChannelIdentity) -> Result<(), ScrapeError> {
        let mut index = self.load_index()?;
        index.channels.retain(|entry| entry.id != identity.id);
        index.channels.push(CatalogIndexEntry {
            id: identity.id.clone(),
            scraped_at: identity.scraped_at,
            path: self.channel_dir(&identity.id).to_string_lossy().into_owned(),
        });
        index.last_updated = Some(Utc::now());

        write_json(&self.root.join(INDEX_FILE), &index)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ScrapeError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}
