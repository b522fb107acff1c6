//! Per-card extraction of a single media item.

use tracing::debug;

use crate::models::MediaItem;
use crate::scrape::resolve::first_match;
use crate::surface::{BoxedElement, ElementHandle};

/// Title-bearing elements inside a card, in rank order.
pub const TITLE_SELECTORS: &[&str] = &["#video-title", "a#video-title-link"];

/// Metadata line spans: first is the view count, second the upload recency.
/// The two fields are positional, not labeled; a fixed order is assumed.
pub const METADATA_SELECTOR: &str = "#metadata-line span, .ytd-video-meta-block span";

/// Sentinel for a metadata field the card did not render.
pub const UNKNOWN_METRIC: &str = "unknown";

/// Extract one media item from a card element.
///
/// Returns `None` when the card lacks a usable title or link: items are
/// all-or-nothing, partial cards are dropped rather than stored with gaps.
pub async fn extract_card(card: &dyn ElementHandle, origin: &str) -> Option<MediaItem> {
    let title_element = first_match(card, TITLE_SELECTORS).await?;

    // Explicit attributes outrank text content: the rendered text node is
    // visually truncated for long titles.
    let mut title = non_empty(title_element.attribute("title").await);
    if title.is_none() {
        title = non_empty(title_element.attribute("aria-label").await);
    }
    if title.is_none() {
        title = non_empty(title_element.text().await);
    }
    let title = title.unwrap_or_default();

    let Some(href) = non_empty(title_element.attribute("href").await) else {
        debug!("card has no link, dropping");
        return None;
    };
    let url = absolutize(&href, origin);

    if title.is_empty() || url.is_empty() {
        debug!("card has empty title or url, dropping");
        return None;
    }

    let metadata = card.query_all(METADATA_SELECTOR).await;
    let views = metric_at(&metadata, 0).await;
    let published = metric_at(&metadata, 1).await;

    Some(MediaItem {
        title,
        views,
        published,
        url,
    })
}

/// Resolve a path to a full URL, handling both absolute and relative links.
fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}

async fn metric_at(spans: &[BoxedElement], index: usize) -> String {
    match spans.get(index) {
        Some(span) => non_empty(span.text().await).unwrap_or_else(|| UNKNOWN_METRIC.to_string()),
        None => UNKNOWN_METRIC.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
