//! Browser session management for rendering dynamic listings.
//!
//! Uses chromiumoxide (CDP) to drive a headless Chrome. The rest of the
//! crate only sees the [`crate::surface`] traits, so everything below this
//! module is swappable.

mod config;
#[cfg(feature = "browser")]
mod page;

pub use config::BrowserEngineConfig;
#[cfg(feature = "browser")]
pub use page::CdpPage;

use crate::error::ScrapeError;
use crate::surface::PageDriver;

#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tracing::info;

/// One rendering session: a launched browser that hands out pages.
#[cfg(feature = "browser")]
pub struct BrowserSession {
    config: BrowserEngineConfig,
    browser: Option<Browser>,
}

#[cfg(feature = "browser")]
impl BrowserSession {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    pub fn new(config: BrowserEngineConfig) -> Self {
        Self {
            config,
            browser: None,
        }
    }

    /// Find the Chrome executable to launch.
    fn find_chrome(&self) -> Result<std::path::PathBuf, ScrapeError> {
        if let Some(explicit) = &self.config.chrome_executable {
            return Ok(explicit.clone());
        }

        for path in Self::CHROME_PATHS {
            let candidate = std::path::Path::new(path);
            if candidate.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(candidate.to_path_buf());
            }
        }

        // Check if in PATH via `which`
        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        info!("Found Chrome in PATH: {}", path);
                        return Ok(std::path::PathBuf::from(path));
                    }
                }
            }
        }

        Err(ScrapeError::Browser(
            "Chrome/Chromium not found. Please install it:\n\
             - Arch/Manjaro: sudo pacman -S chromium\n\
             - Ubuntu/Debian: sudo apt install chromium-browser\n\
             - Fedora: sudo dnf install chromium\n\
             - Or download from: https://www.google.com/chrome/"
                .to_string(),
        ))
    }

    /// Launch the browser if not already running.
    pub async fn launch(&mut self) -> Result<(), ScrapeError> {
        if self.browser.is_some() {
            return Ok(());
        }

        info!("Launching browser (headless={})", self.config.headless);

        let chrome_path = self.find_chrome()?;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(1920, 1080);

        // Set headless mode (with_head means NOT headless, confusingly)
        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--no-sandbox") // Often needed for headless in containers/restricted environments
            .arg("--disable-gpu") // Recommended for headless
            .arg("--disable-software-rasterizer");

        for arg in &self.config.chrome_args {
            builder = builder.arg(arg);
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScrapeError::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Browser(format!("failed to launch browser: {e}")))?;

        // Spawn handler task
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        self.browser = Some(browser);
        Ok(())
    }

    /// Open a fresh page, ready for navigation.
    pub async fn new_page(&self) -> Result<Box<dyn PageDriver>, ScrapeError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or(ScrapeError::SessionNotInitialized)?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        let page = CdpPage::new(page, self.config.timeout);
        page.prepare().await?;
        Ok(Box::new(page))
    }

    /// Close the browser.
    pub async fn close(&mut self) {
        self.browser = None;
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct BrowserSession {
    #[allow(dead_code)]
    config: BrowserEngineConfig,
}

#[cfg(not(feature = "browser"))]
impl BrowserSession {
    pub fn new(config: BrowserEngineConfig) -> Self {
        Self { config }
    }

    pub async fn launch(&mut self) -> Result<(), ScrapeError> {
        Err(ScrapeError::Browser(
            "Browser support not compiled. Rebuild with: cargo build --features browser".into(),
        ))
    }

    pub async fn new_page(&self) -> Result<Box<dyn PageDriver>, ScrapeError> {
        Err(ScrapeError::SessionNotInitialized)
    }

    pub async fn close(&mut self) {}
}
