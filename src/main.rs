//! tubecat - channel metadata scraper.
//!
//! Scrapes channel identity and video listings from a rendered channel page
//! and maintains a deduplicated on-disk catalog.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if tubecat::cli::is_verbose() {
        "tubecat=info"
    } else {
        "tubecat=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    tubecat::cli::run().await
}
