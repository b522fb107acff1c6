//! Command-line interface.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use crate::browser::BrowserSession;
use crate::catalog::{CatalogStore, INDEX_FILE};
use crate::config::ScraperConfig;
use crate::models::{ChannelIdentity, MediaCollection};
use crate::scrape::scrape_channel;

#[derive(Parser)]
#[command(name = "tubecat")]
#[command(about = "Channel metadata scraper with an on-disk JSON catalog")]
#[command(version)]
pub struct Cli {
    /// Channel URL (accepts /@handle, /channel/<id>, and /c/<name> pages)
    url: String,

    /// Dump screenshots and HTML snapshots of each listing while scraping
    #[arg(long)]
    debug_dump: bool,

    /// Show the browser window instead of running headless
    #[arg(long)]
    visible: bool,

    /// Catalog root directory (overrides config file)
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ScraperConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.debug_dump {
        config.debug_dump = true;
    }
    if cli.visible {
        config.browser.headless = false;
    }

    let mut session = BrowserSession::new(config.browser.clone());
    session.launch().await.context("failed to launch browser")?;

    // The session must come down even when the scrape fails.
    let outcome = scrape_and_persist(&session, &cli.url, &config).await;
    session.close().await;
    let (identity, collection) = outcome?;

    println!(
        "{} Collected {} recent and {} popular videos for {}",
        style("✓").green(),
        collection.recent.len(),
        collection.popular.len(),
        identity.id,
    );
    if collection.popular.is_empty() {
        println!(
            "{} Popular listing was unavailable; stored an empty batch",
            style("!").yellow()
        );
    }
    println!(
        "{} Catalog updated: {}",
        style("✓").green(),
        config.data_dir.join(INDEX_FILE).display()
    );

    Ok(())
}

async fn scrape_and_persist(
    session: &BrowserSession,
    url: &str,
    config: &ScraperConfig,
) -> anyhow::Result<(ChannelIdentity, MediaCollection)> {
    let page = session.new_page().await?;
    let (identity, collection) = scrape_channel(page.as_ref(), url, config).await?;

    let store = CatalogStore::new(&config.data_dir);
    store
        .persist(&identity, &collection)
        .context("failed to persist catalog")?;

    Ok((identity, collection))
}
