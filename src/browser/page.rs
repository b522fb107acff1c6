//! chromiumoxide adapter for the rendered-page traits.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, NavigateParams};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Element, Page};

use crate::error::ScrapeError;
use crate::surface::{BoxedElement, DomScope, ElementHandle, PageDriver};

/// Default user agent for browser requests.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// JavaScript to wait for page ready state.
const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 10000);
        }
    })
"#;

const VISIBILITY_POLL: Duration = Duration::from_millis(250);

fn browser_err(error: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(error.to_string())
}

/// One live CDP page.
pub struct CdpPage {
    page: Page,
    timeout: Duration,
}

impl CdpPage {
    pub fn new(page: Page, timeout_secs: u64) -> Self {
        Self {
            page,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Set a realistic user agent before any navigation.
    pub(crate) async fn prepare(&self) -> Result<(), ScrapeError> {
        self.page
            .execute(SetUserAgentOverrideParams::new(
                BROWSER_USER_AGENT.to_string(),
            ))
            .await
            .map_err(browser_err)?;
        Ok(())
    }

    /// Wait for the page to reach a ready state.
    async fn wait_for_ready(&self) {
        match tokio::time::timeout(
            self.timeout,
            self.page.evaluate(WAIT_FOR_READY_SCRIPT.to_string()),
        )
        .await
        {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => {
                debug!("Could not check ready state: {}", e);
            }
            Err(_) => {
                warn!("Timeout waiting for page ready state");
            }
        }
    }
}

#[async_trait]
impl DomScope for CdpPage {
    async fn query(&self, selector: &str) -> Option<BoxedElement> {
        match self.page.find_element(selector).await {
            Ok(element) => Some(Box::new(CdpElement { element })),
            Err(error) => {
                debug!(selector, %error, "page selector lookup missed");
                None
            }
        }
    }

    async fn query_all(&self, selector: &str) -> Vec<BoxedElement> {
        match self.page.find_elements(selector).await {
            Ok(elements) => elements
                .into_iter()
                .map(|element| Box::new(CdpElement { element }) as BoxedElement)
                .collect(),
            Err(error) => {
                debug!(selector, %error, "page selector scan missed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        debug!(url, "navigating");
        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("invalid URL: {e}"),
            })?;

        tokio::time::timeout(self.timeout, self.page.execute(nav_params))
            .await
            .map_err(|_| ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {}s", self.timeout.as_secs()),
            })?
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_ready().await;
        Ok(())
    }

    async fn scroll_by(&self, pixels: i64) -> Result<(), ScrapeError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {pixels})"))
            .await
            .map_err(browser_err)?;
        Ok(())
    }

    async fn settle(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }

    async fn html(&self) -> Result<String, ScrapeError> {
        self.page.content().await.map_err(browser_err)
    }

    async fn screenshot(&self, path: &Path) -> Result<(), ScrapeError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(false)
            .build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(browser_err)?;
        Ok(())
    }
}

/// One located element on a CDP page.
pub struct CdpElement {
    element: Element,
}

#[async_trait]
impl DomScope for CdpElement {
    async fn query(&self, selector: &str) -> Option<BoxedElement> {
        match self.element.find_element(selector).await {
            Ok(element) => Some(Box::new(CdpElement { element })),
            Err(error) => {
                debug!(selector, %error, "element selector lookup missed");
                None
            }
        }
    }

    async fn query_all(&self, selector: &str) -> Vec<BoxedElement> {
        match self.element.find_elements(selector).await {
            Ok(elements) => elements
                .into_iter()
                .map(|element| Box::new(CdpElement { element }) as BoxedElement)
                .collect(),
            Err(error) => {
                debug!(selector, %error, "element selector scan missed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ElementHandle for CdpElement {
    async fn wait_visible(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Ok(model) = self.element.box_model().await {
                if model.width > 0 && model.height > 0 {
                    return true;
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn text(&self) -> Option<String> {
        match self.element.inner_text().await {
            Ok(text) => text,
            Err(error) => {
                debug!(%error, "text read failed");
                None
            }
        }
    }

    async fn attribute(&self, name: &str) -> Option<String> {
        match self.element.attribute(name).await {
            Ok(value) => value,
            Err(error) => {
                debug!(name, %error, "attribute read failed");
                None
            }
        }
    }

    async fn click(&self) -> Result<(), ScrapeError> {
        self.element.click().await.map_err(browser_err)?;
        Ok(())
    }
}
