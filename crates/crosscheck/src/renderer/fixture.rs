//! In-memory renderer serving canned element text.
//!
//! Pages are registered by URL with a table of XPath -> visible text.
//! Lookups are exact string matches on the XPath, which is enough to drive
//! the extractors without a browser.

use super::{NavigationResult, RenderContext, Renderer};
use crate::error::{CheckError, CheckResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A fake page: element text keyed by XPath.
pub type FixturePage = HashMap<String, String>;

#[derive(Default)]
struct Shared {
    pages: HashMap<String, FixturePage>,
    active: AtomicUsize,
    opened: AtomicUsize,
    shut_down: AtomicBool,
}

/// Renderer whose pages are preloaded maps.
#[derive(Default, Clone)]
pub struct FixtureRenderer {
    shared: Arc<Shared>,
}

impl FixtureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page.
    ///
    /// # Panics
    ///
    /// If the renderer has already been cloned.
    pub fn with_page<I, K, V>(mut self, url: &str, elements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let page = elements
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Arc::get_mut(&mut self.shared)
            .expect("pages must be registered before the renderer is cloned")
            .pages
            .insert(url.to_string(), page);
        self
    }

    /// Whether `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shared.shut_down.load(Ordering::SeqCst)
    }

    /// Total contexts ever handed out.
    pub fn contexts_opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn new_context(&self) -> CheckResult<Box<dyn RenderContext>> {
        if self.is_shut_down() {
            return Err(CheckError::Browser("renderer already shut down".into()));
        }
        self.shared.active.fetch_add(1, Ordering::SeqCst);
        self.shared.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureContext {
            shared: Arc::clone(&self.shared),
            current: None,
        }))
    }

    async fn shutdown(&self) -> CheckResult<()> {
        self.shared.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.shared.active.load(Ordering::SeqCst)
    }
}

struct FixtureContext {
    shared: Arc<Shared>,
    current: Option<String>,
}

#[async_trait]
impl RenderContext for FixtureContext {
    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> CheckResult<NavigationResult> {
        if !self.shared.pages.contains_key(url) {
            return Err(CheckError::Browser(format!(
                "navigation to {url} failed: net::ERR_NAME_NOT_RESOLVED"
            )));
        }
        self.current = Some(url.to_string());
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 0,
        })
    }

    async fn element_text(&self, xpath: &str) -> CheckResult<Option<String>> {
        Ok(self
            .current
            .as_ref()
            .and_then(|url| self.shared.pages.get(url))
            .and_then(|page| page.get(xpath))
            .cloned())
    }

    async fn close(self: Box<Self>) -> CheckResult<()> {
        self.shared.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_lookup_and_lifecycle() {
        let renderer =
            FixtureRenderer::new().with_page("https://w.test/wiki/A", [("//h2", "Heading")]);

        let mut ctx = renderer.new_context().await.unwrap();
        assert_eq!(renderer.active_contexts(), 1);
        assert_eq!(ctx.element_text("//h2").await.unwrap(), None);

        let nav = ctx.navigate("https://w.test/wiki/A", 1000).await.unwrap();
        assert_eq!(nav.final_url, "https://w.test/wiki/A");
        assert_eq!(
            ctx.element_text("//h2").await.unwrap().as_deref(),
            Some("Heading")
        );
        assert_eq!(ctx.element_text("//p").await.unwrap(), None);

        ctx.close().await.unwrap();
        renderer.shutdown().await.unwrap();
        assert_eq!(renderer.active_contexts(), 0);
        assert!(renderer.is_shut_down());
        assert!(renderer.new_context().await.is_err());
    }

    #[test]
    #[should_panic(expected = "before the renderer is cloned")]
    fn test_with_page_after_clone_panics() {
        let renderer = FixtureRenderer::new();
        let _shared = renderer.clone();
        let _ = renderer.with_page("https://w.test/wiki/A", [("//h2", "Heading")]);
    }

    #[tokio::test]
    async fn test_unknown_url_fails_navigation() {
        let renderer = FixtureRenderer::new();
        let mut ctx = renderer.new_context().await.unwrap();
        let err = ctx.navigate("https://nowhere.test/", 1000).await.unwrap_err();
        assert!(matches!(err, CheckError::Browser(_)));
    }
}
