//! Batch collection of media items from a listing page.

use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::MediaItem;
use crate::scrape::identity::popular_videos_url;
use crate::scrape::item::extract_card;
use crate::scrape::lazyload::expand_listing;
use crate::surface::{BoxedElement, PageDriver};

/// Card container used by the current renderer layout.
pub const RICH_CARD_SELECTOR: &str = "ytd-rich-item-renderer";

/// Card container used by the older grid layout.
pub const GRID_CARD_SELECTOR: &str = "ytd-grid-video-renderer";

/// Container fallback order: rich layout first, grid layout second.
pub const CARD_SELECTORS: &[&str] = &[RICH_CARD_SELECTOR, GRID_CARD_SELECTOR];

/// Which listing a collection run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// The channel's default upload-ordered listing.
    Recent,
    /// The engagement-sorted listing.
    Popular,
}

impl Listing {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Popular => "popular",
        }
    }
}

/// Collect up to the listing's item cap from the current page.
///
/// Cards that fail extraction are skipped and counted as losses, never as a
/// batch failure. Encounter order is preserved.
pub async fn collect(
    page: &dyn PageDriver,
    listing: Listing,
    origin: &str,
    config: &ScraperConfig,
) -> Result<Vec<MediaItem>, ScrapeError> {
    let cap = config.item_cap(listing);
    let budget = config.scroll_budget(listing);

    let available = expand_listing(page, CARD_SELECTORS, &budget).await?;
    info!(listing = listing.label(), available, cap, "collecting cards");

    let cards = cards_in_order(page).await;
    let mut items = Vec::new();

    for (position, card) in cards.iter().take(cap).enumerate() {
        match extract_card(card.as_ref(), origin).await {
            Some(item) => {
                debug!(position, title = %item.title, "extracted");
                items.push(item);
            }
            None => {
                warn!(
                    listing = listing.label(),
                    position, "skipping card with missing title or link"
                );
            }
        }
    }

    info!(
        listing = listing.label(),
        collected = items.len(),
        "collection complete"
    );
    Ok(items)
}

/// Collect the popular listing, best-effort.
///
/// Navigates to the engagement-sorted view first. Any failure, navigation
/// included, degrades to an empty batch: popular extraction must never block
/// persistence of the recent listing.
pub async fn collect_popular(
    page: &dyn PageDriver,
    channel_url: &str,
    origin: &str,
    config: &ScraperConfig,
) -> Vec<MediaItem> {
    let url = popular_videos_url(channel_url);
    let attempt = async {
        page.goto(&url).await?;
        page.settle(config.initial_settle()).await;
        if config.debug_dump {
            super::dump_page_state(page, "popular_videos_page").await;
        }
        collect(page, Listing::Popular, origin, config).await
    };

    match attempt.await {
        Ok(items) => items,
        Err(error) => {
            warn!(%error, "popular listing unavailable, continuing without it");
            Vec::new()
        }
    }
}

async fn cards_in_order(page: &dyn PageDriver) -> Vec<BoxedElement> {
    for selector in CARD_SELECTORS {
        let cards = page.query_all(selector).await;
        if !cards.is_empty() {
            return cards;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::fake::{FakeElement, FakePage};

    const ORIGIN: &str = "https://www.youtube.com";

    fn test_config() -> ScraperConfig {
        // No scrolling in unit tests: the fakes are fully materialized.
        ScraperConfig {
            recent_scroll_rounds: 0,
            popular_scroll_rounds: 0,
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

    fn linkless_card() -> FakeElement {
        FakeElement::new().with_children(
            "#video-title",
            vec![FakeElement::new().with_attr("title", "No Link")],
        )
    }

    #[tokio::test]
    async fn cap_limits_collection_in_encounter_order() {
        let cards = (0..5).map(card).collect();
        let page = FakePage::new().with_matches(RICH_CARD_SELECTOR, cards);

        let mut config = test_config();
        config.recent_cap = 3;

        let items = collect(&page, Listing::Recent, ORIGIN, &config).await.unwrap();
        let titles: Vec<_> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, ["Video 0", "Video 1", "Video 2"]);
    }

    #[tokio::test]
    async fn unextractable_cards_are_skipped_not_fatal() {
        let cards = vec![card(0), linkless_card(), card(2), card(3)];
        let page = FakePage::new().with_matches(RICH_CARD_SELECTOR, cards);

        let items = collect(&page, Listing::Recent, ORIGIN, &test_config())
            .await
            .unwrap();
        let titles: Vec<_> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, ["Video 0", "Video 2", "Video 3"]);
    }

    #[tokio::test]
    async fn grid_layout_is_used_when_rich_layout_is_absent() {
        let page = FakePage::new().with_matches(GRID_CARD_SELECTOR, vec![card(7)]);

        let items = collect(&page, Listing::Recent, ORIGIN, &test_config())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Video 7");
    }

    #[tokio::test]
    async fn empty_listing_collects_nothing() {
        let page = FakePage::new();
        let items = collect(&page, Listing::Recent, ORIGIN, &test_config())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn popular_degrades_to_empty_on_navigation_failure() {
        let page = FakePage::new()
            .with_matches(RICH_CARD_SELECTOR, vec![card(0)])
            .failing_navigation_to("sort=p");

        let items = collect_popular(
            &page,
            "https://www.youtube.com/@creator",
            ORIGIN,
            &test_config(),
        )
        .await;

        assert!(items.is_empty());
        assert_eq!(page.visited().len(), 1);
    }

    #[tokio::test]
    async fn popular_collects_after_navigation() {
        let page = FakePage::new().with_matches(RICH_CARD_SELECTOR, vec![card(1), card(2)]);

        let items = collect_popular(
            &page,
            "https://www.youtube.com/@creator",
            ORIGIN,
            &test_config(),
        )
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(
            page.visited(),
            ["https://www.youtube.com/@creator/videos?view=0&sort=p&flow=grid"]
        );
    }
}
