//! Rendered-page access traits.
//!
//! The extraction engine never talks to the devtools protocol directly; it
//! works against these object-safe traits so the whole pipeline can run
//! against in-memory fakes in tests. The chromiumoxide adapter lives in
//! [`crate::browser`].
//!
//! Lookup failures (absent element, detached node, protocol hiccups) are
//! reported as misses, never as errors: the underlying page structure is
//! unstable across renderer versions and a missing candidate is an expected
//! condition, not a fault.

#[cfg(test)]
pub mod fake;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

pub type BoxedElement = Box<dyn ElementHandle>;

/// Anything elements can be looked up in: a page or another element.
#[async_trait]
pub trait DomScope: Send + Sync {
    /// First element matching `selector`, or `None` on a miss.
    async fn query(&self, selector: &str) -> Option<BoxedElement>;

    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Vec<BoxedElement>;
}

/// One located element.
#[async_trait]
pub trait ElementHandle: DomScope {
    /// Wait until the element has a rendered box, up to `timeout`.
    async fn wait_visible(&self, timeout: Duration) -> bool;

    /// Rendered text content, if any.
    async fn text(&self) -> Option<String>;

    /// Attribute value, if present.
    async fn attribute(&self, name: &str) -> Option<String>;

    async fn click(&self) -> Result<(), ScrapeError>;
}

/// One live page in the rendering session.
#[async_trait]
pub trait PageDriver: DomScope {
    /// Navigate and wait for the document to load.
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Trigger a downward scroll by `pixels`.
    async fn scroll_by(&self, pixels: i64) -> Result<(), ScrapeError>;

    /// Idle to let asynchronous content insertion complete.
    async fn settle(&self, delay: Duration);

    /// Full document HTML serialization.
    async fn html(&self) -> Result<String, ScrapeError>;

    /// Capture a viewport screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), ScrapeError>;
}
