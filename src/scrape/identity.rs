//! Channel identity resolution and derived listing URLs.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::ScrapeError;

fn shape_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // /@handle keeps its @ prefix; /channel/<id> and /c/<name> use
            // the captured segment as-is.
            Regex::new(r"/@([^/?#]+)").unwrap(),
            Regex::new(r"/channel/([^/?#]+)").unwrap(),
            Regex::new(r"/c/([^/?#]+)").unwrap(),
        ]
    })
}

/// Derive the stable catalog key from a channel URL.
///
/// Accepts three URL shapes, tried in order: handle-prefixed (`.../@name`),
/// id-prefixed (`.../channel/<id>`), and custom-name-prefixed
/// (`.../c/<name>`). Matching is on path shape only, not on the host, and is
/// deterministic for a given URL.
pub fn channel_id_from_url(url: &str) -> Result<String, ScrapeError> {
    let [handle, channel, custom] = shape_patterns();

    if let Some(captures) = handle.captures(url) {
        return Ok(format!("@{}", &captures[1]));
    }
    if let Some(captures) = channel.captures(url) {
        return Ok(captures[1].to_string());
    }
    if let Some(captures) = custom.captures(url) {
        return Ok(captures[1].to_string());
    }

    Err(ScrapeError::InvalidSourceUrl(url.to_string()))
}

/// Primary listing URL for a channel.
pub fn videos_url(channel_url: &str) -> String {
    format!("{}/videos", channel_url.trim_end_matches('/'))
}

/// Popular listing URL: same listing, engagement-sorted grid view.
pub fn popular_videos_url(channel_url: &str) -> String {
    format!(
        "{}/videos?view=0&sort=p&flow=grid",
        channel_url.trim_end_matches('/')
    )
}

/// Origin used to absolutize relative card links.
///
/// Derived from the channel URL itself; falls back to the configured
/// canonical origin when the URL does not parse to one.
pub fn site_origin(channel_url: &str, fallback: &str) -> String {
    Url::parse(channel_url)
        .ok()
        .map(|url| url.origin().ascii_serialization())
        .filter(|origin| origin != "null")
        .unwrap_or_else(|| fallback.trim_end_matches('/').to_string())
}
