//! In-memory page and element fakes for exercising the extraction engine.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{BoxedElement, DomScope, ElementHandle, PageDriver};
use crate::error::ScrapeError;

/// A scripted DOM element.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: Option<String>,
    pub attrs: HashMap<String, String>,
    pub visible: bool,
    /// Child matches keyed by selector.
    pub children: HashMap<String, Vec<FakeElement>>,
    /// Simulates a detached node: every read misses.
    pub broken: bool,
}

impl FakeElement {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_children(mut self, selector: &str, children: Vec<FakeElement>) -> Self {
        self.children.insert(selector.to_string(), children);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[async_trait]
impl DomScope for FakeElement {
    async fn query(&self, selector: &str) -> Option<BoxedElement> {
        if self.broken {
            return None;
        }
        self.children
            .get(selector)
            .and_then(|matches| matches.first())
            .map(|element| Box::new(element.clone()) as BoxedElement)
    }

    async fn query_all(&self, selector: &str) -> Vec<BoxedElement> {
        if self.broken {
            return Vec::new();
        }
        self.children
            .get(selector)
            .map(|matches| {
                matches
                    .iter()
                    .map(|element| Box::new(element.clone()) as BoxedElement)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn wait_visible(&self, _timeout: Duration) -> bool {
        self.visible && !self.broken
    }

    async fn text(&self) -> Option<String> {
        if self.broken {
            return None;
        }
        self.text.clone()
    }

    async fn attribute(&self, name: &str) -> Option<String> {
        if self.broken {
            return None;
        }
        self.attrs.get(name).cloned()
    }

    async fn click(&self) -> Result<(), ScrapeError> {
        if self.broken {
            return Err(ScrapeError::Browser("element detached".into()));
        }
        Ok(())
    }
}

/// A scripted page. Matches are keyed by selector; scrolling pops growth
/// events so lazy-load behavior can be simulated round by round.
#[derive(Debug, Default)]
pub struct FakePage {
    pub matches: Mutex<HashMap<String, Vec<FakeElement>>>,
    /// Each scroll appends one element to the named selector's matches.
    pub growth: Mutex<VecDeque<(String, FakeElement)>>,
    pub visited: Mutex<Vec<String>>,
    pub scrolls: Mutex<usize>,
    /// Navigation to any URL containing this substring fails.
    pub fail_url_containing: Option<String>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.matches
            .lock()
            .unwrap()
            .insert(selector.to_string(), elements);
        self
    }

    pub fn with_growth(self, schedule: Vec<(String, FakeElement)>) -> Self {
        *self.growth.lock().unwrap() = schedule.into();
        self
    }

    pub fn failing_navigation_to(mut self, fragment: &str) -> Self {
        self.fail_url_containing = Some(fragment.to_string());
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn scroll_count(&self) -> usize {
        *self.scrolls.lock().unwrap()
    }
}

#[async_trait]
impl DomScope for FakePage {
    async fn query(&self, selector: &str) -> Option<BoxedElement> {
        self.matches
            .lock()
            .unwrap()
            .get(selector)
            .and_then(|matches| matches.first())
            .map(|element| Box::new(element.clone()) as BoxedElement)
    }

    async fn query_all(&self, selector: &str) -> Vec<BoxedElement> {
        self.matches
            .lock()
            .unwrap()
            .get(selector)
            .map(|matches| {
                matches
                    .iter()
                    .map(|element| Box::new(element.clone()) as BoxedElement)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.visited.lock().unwrap().push(url.to_string());
        if let Some(fragment) = &self.fail_url_containing {
            if url.contains(fragment.as_str()) {
                return Err(ScrapeError::Navigation {
                    url: url.to_string(),
                    reason: "scripted failure".into(),
                });
            }
        }
        Ok(())
    }

    async fn scroll_by(&self, _pixels: i64) -> Result<(), ScrapeError> {
        *self.scrolls.lock().unwrap() += 1;
        if let Some((selector, element)) = self.growth.lock().unwrap().pop_front() {
            self.matches
                .lock()
                .unwrap()
                .entry(selector)
                .or_default()
                .push(element);
        }
        Ok(())
    }

    async fn settle(&self, _delay: Duration) {}

    async fn html(&self) -> Result<String, ScrapeError> {
        Ok("<html></html>".to_string())
    }

    async fn screenshot(&self, _path: &Path) -> Result<(), ScrapeError> {
        Ok(())
    }
}
