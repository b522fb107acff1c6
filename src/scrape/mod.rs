//! Channel scraping pipeline.
//!
//! One page session drives the whole flow sequentially: resolve identity,
//! load the videos listing, expand it, extract cards, then repeat for the
//! popular listing best-effort.

pub mod collector;
pub mod identity;
pub mod item;
pub mod lazyload;
pub mod resolve;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::{ChannelIdentity, MediaCollection};
use crate::surface::PageDriver;

pub use collector::{collect, collect_popular, Listing};
pub use identity::channel_id_from_url;

/// Channel display name in the listing header, in rank order.
const CHANNEL_NAME_SELECTORS: &[&str] =
    &["#channel-name #text", "ytd-channel-name #text", "#page-header h1"];

/// Consent interstitial accept buttons.
const CONSENT_SELECTORS: &[&str] = &[
    r#"button[aria-label*="Accept"]"#,
    r#"tp-yt-paper-button[aria-label*="Accept"]"#,
];

const CONSENT_TIMEOUT: Duration = Duration::from_secs(3);

/// Scrape one channel: identity, recent listing, popular listing.
///
/// Identity resolution happens before any navigation, so an invalid URL
/// fails with no partial state. A navigation failure on the primary listing
/// is fatal; the popular listing degrades to an empty batch instead.
pub async fn scrape_channel(
    page: &dyn PageDriver,
    channel_url: &str,
    config: &ScraperConfig,
) -> Result<(ChannelIdentity, MediaCollection), ScrapeError> {
    let id = channel_id_from_url(channel_url)?;
    let origin = identity::site_origin(channel_url, &config.origin);

    info!(%id, "loading channel videos listing");
    page.goto(&identity::videos_url(channel_url)).await?;
    page.settle(config.initial_settle()).await;
    dismiss_consent(page).await;

    if config.debug_dump {
        dump_page_state(page, "videos_page_initial").await;
    }

    let name = resolve::resolve_text(page, CHANNEL_NAME_SELECTORS, "", config.selector_timeout())
        .await;

    let identity = ChannelIdentity {
        id,
        name,
        source_url: channel_url.to_string(),
        scraped_at: Utc::now(),
    };

    let recent = collect(page, Listing::Recent, &origin, config).await?;
    let popular = collect_popular(page, channel_url, &origin, config).await;

    Ok((identity, MediaCollection { recent, popular }))
}

/// Click through the consent interstitial when one is shown.
async fn dismiss_consent(page: &dyn PageDriver) {
    for selector in CONSENT_SELECTORS {
        let Some(button) = page.query(selector).await else {
            continue;
        };
        if !button.wait_visible(CONSENT_TIMEOUT).await {
            continue;
        }
        match button.click().await {
            Ok(()) => {
                info!("dismissed consent prompt");
                page.settle(Duration::from_secs(2)).await;
            }
            Err(error) => warn!(%error, "consent prompt click failed"),
        }
        return;
    }
}

/// Dump a screenshot and HTML snapshot of the current page state.
///
/// Diagnostic only; failures are logged and swallowed.
pub async fn dump_page_state(page: &dyn PageDriver, label: &str) {
    let screenshot_path = PathBuf::from(format!("debug_{label}.png"));
    match page.screenshot(&screenshot_path).await {
        Ok(()) => info!(path = %screenshot_path.display(), "saved screenshot"),
        Err(error) => warn!(%error, "screenshot capture failed"),
    }

    match page.html().await {
        Ok(html) => {
            let html_path = format!("debug_{label}.html");
            match std::fs::write(&html_path, html) {
                Ok(()) => info!(path = html_path, "saved page HTML"),
                Err(error) => warn!(%error, "page HTML dump failed"),
            }
        }
        Err(error) => warn!(%error, "page HTML serialization failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::collector::RICH_CARD_SELECTOR;
    use crate::surface::fake::{FakeElement, FakePage};

    fn no_scroll_config() -> ScraperConfig {
        ScraperConfig {
            recent_scroll_rounds: 0,
            popular_scroll_rounds: 0,
            initial_settle_ms: 0,
            ..ScraperConfig::default()
        }
    }

    fn card(index: usize) -> FakeElement {
        FakeElement::new().with_children(
            "#video-title",
            vec![FakeElement::new()
                .with_attr("title", &format!("Video {index}"))
                .with_attr("href", &format!("/watch?v={index}"))],
        )
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_navigation() {
        let page = FakePage::new();
        let result = scrape_channel(&page, "https://example.com", &no_scroll_config()).await;

        assert!(matches!(result, Err(ScrapeError::InvalidSourceUrl(_))));
        assert!(page.visited().is_empty());
    }

    #[tokio::test]
    async fn primary_navigation_failure_is_fatal() {
        let page = FakePage::new().failing_navigation_to("/videos");
        let result = scrape_channel(&page, "https://example.com/@creator1", &no_scroll_config())
            .await;

        assert!(matches!(result, Err(ScrapeError::Navigation { .. })));
    }

    #[tokio::test]
    async fn popular_failure_still_yields_the_recent_listing() {
        let page = FakePage::new()
            .with_matches(RICH_CARD_SELECTOR, vec![card(0), card(1)])
            .failing_navigation_to("sort=p");

        let (identity, collection) =
            scrape_channel(&page, "https://example.com/@creator1", &no_scroll_config())
                .await
                .unwrap();

        assert_eq!(identity.id, "@creator1");
        assert_eq!(collection.recent.len(), 2);
        assert!(collection.popular.is_empty());
    }

    #[tokio::test]
    async fn full_scrape_visits_both_listings() {
        let page = FakePage::new()
            .with_matches(RICH_CARD_SELECTOR, vec![card(0)])
            .with_matches(
                "#channel-name #text",
                vec![FakeElement::new().with_text("Creator One")],
            );

        let (identity, collection) =
            scrape_channel(&page, "https://example.com/@creator1", &no_scroll_config())
                .await
                .unwrap();

        assert_eq!(identity.id, "@creator1");
        assert_eq!(identity.name, "Creator One");
        assert_eq!(identity.source_url, "https://example.com/@creator1");
        assert_eq!(collection.recent.len(), 1);
        // Popular sees the same fake DOM, so it collects the same card.
        assert_eq!(collection.popular.len(), 1);
        assert_eq!(
            page.visited(),
            [
                "https://example.com/@creator1/videos",
                "https://example.com/@creator1/videos?view=0&sort=p&flow=grid"
            ]
        );
    }
}
