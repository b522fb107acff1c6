//! Error taxonomy for the scrape and persist pipeline.
//!
//! Only run-fatal conditions are represented here. Per-candidate selector
//! misses and per-item extraction failures are absorbed and logged at their
//! boundaries instead of being surfaced as error values.

use thiserror::Error;

/// Errors that terminate a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The source URL matches none of the accepted channel URL shapes.
    #[error("not a recognized channel URL: {0}")]
    InvalidSourceUrl(String),

    /// A page was requested before the browser session was launched.
    #[error("browser session not initialized")]
    SessionNotInitialized,

    /// Navigation did not complete. Fatal for the primary listing; the
    /// popular listing degrades to an empty batch instead.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Devtools-protocol failure outside navigation.
    #[error("browser error: {0}")]
    Browser(String),

    /// Catalog I/O failed; the on-disk state can no longer be trusted.
    #[error("catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog snapshot could not be serialized or parsed.
    #[error("catalog serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
