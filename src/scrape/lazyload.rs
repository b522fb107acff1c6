//! Scroll-driven lazy-load expansion.
//!
//! Listings materialize cards only as the viewport approaches them. The
//! driver scrolls, idles for the settle delay, and re-counts cards; it stops
//! once the count holds steady for two consecutive rounds or the round
//! budget runs out, whichever comes first.

use std::time::Duration;

use tracing::debug;

use crate::error::ScrapeError;
use crate::surface::{DomScope, PageDriver};

/// Rounds with an unchanged card count before the listing counts as fully
/// materialized.
const STABLE_ROUNDS: u32 = 2;

/// Per-listing scroll budget.
#[derive(Debug, Clone)]
pub struct ScrollBudget {
    /// Ceiling on scroll rounds; convergence may stop earlier.
    pub max_rounds: u32,
    /// Pixels per scroll step.
    pub step_px: i64,
    /// Idle time after each scroll.
    pub settle_delay: Duration,
}

/// Expand a lazy listing until its card count converges or the budget is
/// exhausted. Returns the final card count.
pub async fn expand_listing(
    page: &dyn PageDriver,
    card_selectors: &[&str],
    budget: &ScrollBudget,
) -> Result<usize, ScrapeError> {
    let mut count = count_cards(page, card_selectors).await;
    let mut unchanged = 0u32;

    for round in 0..budget.max_rounds {
        page.scroll_by(budget.step_px).await?;
        page.settle(budget.settle_delay).await;

        let next = count_cards(page, card_selectors).await;
        if next == count {
            unchanged += 1;
            if unchanged >= STABLE_ROUNDS {
                debug!(round, count = next, "card count settled");
                break;
            }
        } else {
            unchanged = 0;
            count = next;
        }
    }

    Ok(count)
}

/// Count cards through the container-selector fallback: the first selector
/// with any matches wins.
pub async fn count_cards(scope: &dyn DomScope, card_selectors: &[&str]) -> usize {
    for selector in card_selectors {
        let found = scope.query_all(selector).await.len();
        if found > 0 {
            return found;
        }
    }
    0
}
