//! Fallback-selector resolution.
//!
//! The page structure drifts across renderer versions and experiments, so
//! every extraction goes through an ordered list of candidate selectors.
//! A candidate that is absent, hidden, or errors counts as a miss and
//! resolution moves on; only exhaustion of the whole list yields the
//! caller-supplied fallback.

use std::time::Duration;

use tracing::debug;

use crate::surface::{BoxedElement, DomScope};

/// Resolve the first visible, non-empty trimmed text among `candidates`.
///
/// Returns `fallback` when every candidate misses. Missing metadata must
/// never abort a batch, so this function cannot fail.
pub async fn resolve_text(
    scope: &dyn DomScope,
    candidates: &[&str],
    fallback: &str,
    per_candidate_timeout: Duration,
) -> String {
    for selector in candidates {
        let Some(element) = scope.query(selector).await else {
            debug!(selector, "candidate missed, trying next");
            continue;
        };
        if !element.wait_visible(per_candidate_timeout).await {
            debug!(selector, "candidate matched but never became visible");
            continue;
        }
        if let Some(text) = element.text().await {
            let text = text.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    fallback.to_string()
}

/// First candidate selector that matches an element, in rank order.
pub async fn first_match(scope: &dyn DomScope, candidates: &[&str]) -> Option<BoxedElement> {
    for selector in candidates {
        if let Some(element) = scope.query(selector).await {
            return Some(element);
        }
    }
    None
}
