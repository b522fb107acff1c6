//! Scraper configuration.
//!
//! Every field has a serde default so a config file only needs to name what
//! it overrides. Defaults mirror the listing depths the tool was tuned
//! against: a deeper scroll budget for the recent listing, a shallower one
//! for the popular listing, which hits its cap sooner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::browser::BrowserEngineConfig;
use crate::scrape::collector::Listing;
use crate::scrape::lazyload::ScrollBudget;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "tubecat.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Catalog root directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Origin used to absolutize relative card links when the channel URL
    /// itself cannot provide one.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Item cap for the recent listing.
    #[serde(default = "default_recent_cap")]
    pub recent_cap: usize,

    /// Item cap for the popular listing.
    #[serde(default = "default_popular_cap")]
    pub popular_cap: usize,

    /// Scroll-round ceiling for the recent listing; the convergence loop may
    /// stop earlier.
    #[serde(default = "default_recent_rounds")]
    pub recent_scroll_rounds: u32,

    /// Scroll-round ceiling for the popular listing.
    #[serde(default = "default_popular_rounds")]
    pub popular_scroll_rounds: u32,

    /// Pixels per scroll step.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: i64,

    /// Idle time after each scroll, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Per-candidate visibility wait, in milliseconds.
    #[serde(default = "default_selector_timeout_ms")]
    pub selector_timeout_ms: u64,

    /// Idle time after the first navigation, in milliseconds.
    #[serde(default = "default_initial_settle_ms")]
    pub initial_settle_ms: u64,

    /// Dump screenshots and HTML snapshots while scraping.
    #[serde(default)]
    pub debug_dump: bool,

    #[serde(default)]
    pub browser: BrowserEngineConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            origin: default_origin(),
            recent_cap: default_recent_cap(),
            popular_cap: default_popular_cap(),
            recent_scroll_rounds: default_recent_rounds(),
            popular_scroll_rounds: default_popular_rounds(),
            scroll_step: default_scroll_step(),
            settle_ms: default_settle_ms(),
            selector_timeout_ms: default_selector_timeout_ms(),
            initial_settle_ms: default_initial_settle_ms(),
            debug_dump: false,
            browser: BrowserEngineConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from `path`, or from `tubecat.toml` in the working
    /// directory when present, or defaults otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !implicit.exists() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn item_cap(&self, listing: Listing) -> usize {
        match listing {
            Listing::Recent => self.recent_cap,
            Listing::Popular => self.popular_cap,
        }
    }

    pub fn scroll_budget(&self, listing: Listing) -> ScrollBudget {
        let max_rounds = match listing {
            Listing::Recent => self.recent_scroll_rounds,
            Listing::Popular => self.popular_scroll_rounds,
        };
        ScrollBudget {
            max_rounds,
            step_px: self.scroll_step,
            settle_delay: Duration::from_millis(self.settle_ms),
        }
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }

    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_origin() -> String {
    "https://www.youtube.com".to_string()
}

fn default_recent_cap() -> usize {
    20
}

fn default_popular_cap() -> usize {
    10
}

fn default_recent_rounds() -> u32 {
    5
}

fn default_popular_rounds() -> u32 {
    3
}

fn default_scroll_step() -> i64 {
    1000
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_selector_timeout_ms() -> u64 {
    10_000
}

fn default_initial_settle_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_favor_the_recent_listing() {
        let config = ScraperConfig::default();
        assert!(config.recent_cap > config.popular_cap);
        assert!(config.recent_scroll_rounds > config.popular_scroll_rounds);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: ScraperConfig = toml::from_str("recent_cap = 7").unwrap();
        assert_eq!(config.recent_cap, 7);
        assert_eq!(config.popular_cap, default_popular_cap());
        assert_eq!(config.data_dir, default_data_dir());
        assert!(config.browser.headless);
    }

    #[test]
    fn missing_implicit_config_file_yields_defaults() {
        let config = ScraperConfig::load(None).unwrap();
        assert_eq!(config.recent_cap, default_recent_cap());
    }
}
