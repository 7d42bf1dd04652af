//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (Chromium via chromiumoxide in production, a
//! canned-page renderer in tests).

pub mod chromium;
pub mod fixture;

use crate::error::CheckResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> CheckResult<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> CheckResult<()>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL, waiting for the load to finish or `timeout_ms`.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> CheckResult<NavigationResult>;
    /// Visible text of the first element matching `xpath`.
    ///
    /// `Ok(None)` means nothing matched; errors are reserved for the
    /// browser itself failing.
    async fn element_text(&self, xpath: &str) -> CheckResult<Option<String>>;
    /// Close this context.
    async fn close(self: Box<Self>) -> CheckResult<()>;
}
