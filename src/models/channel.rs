//! Channel identity and extracted media items.
//!
//! Engagement and recency metrics stay as opaque display strings. The source
//! renders them locale-dependent ("1.2M views", "3 weeks ago"), so typed
//! parsing belongs to downstream consumers, not the extraction core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a tracked channel, derived from its source URL.
///
/// The `id` partitions all persisted data for one channel and is stable
/// across re-scrapes of the same URL shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelIdentity {
    /// Catalog partition key: canonical handle or opaque channel id.
    pub id: String,
    /// Channel display name as rendered; empty when it could not be resolved.
    #[serde(default)]
    pub name: String,
    /// URL the identity was derived from.
    pub source_url: String,
    /// When this scrape ran.
    pub scraped_at: DateTime<Utc>,
}

/// One extracted video card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub title: String,
    /// View-count display string; "unknown" when the metadata line lacked it.
    pub views: String,
    /// Upload-recency display string; "unknown" when absent.
    pub published: String,
    /// Absolute link to the video.
    pub url: String,
}

/// Extracted listings for one channel, in source presentation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaCollection {
    pub recent: Vec<MediaItem>,
    pub popular: Vec<MediaItem>,
}
