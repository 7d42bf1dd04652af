//! Chromium-based renderer using chromiumoxide.

use super::{NavigationResult, RenderContext, Renderer};
use crate::error::{CheckError, CheckResult};
use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Environment variable naming an explicit browser executable.
pub const CHROMIUM_PATH_ENV: &str = "CROSSCHECK_CHROMIUM_PATH";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // Chrome for Testing unpacked under the home directory
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".crosscheck/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".crosscheck/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
            ]
        } else {
            vec![home.join(".crosscheck/chromium/chrome-linux64/chrome")]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Script resolving `xpath` to its first node in document order.
///
/// Always yields an object, so a missing node does not come back as a bare
/// JS `null` (which CDP reports as "no value").
fn lookup_script(xpath: &str) -> String {
    let quoted = serde_json::Value::String(xpath.to_string());
    format!(
        "(() => {{ \
           const n = document.evaluate({quoted}, document, null, \
             XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue; \
           if (n === null) return {{ found: false }}; \
           return {{ found: true, text: n.innerText ?? n.textContent ?? '' }}; \
         }})()"
    )
}

#[derive(Deserialize)]
struct Lookup {
    found: bool,
    #[serde(default)]
    text: Option<String>,
}

/// Decode the object produced by [`lookup_script`].
fn parse_lookup(value: serde_json::Value) -> CheckResult<Option<String>> {
    let lookup: Lookup = serde_json::from_value(value)
        .map_err(|e| CheckError::Browser(format!("unexpected lookup result: {e}")))?;
    Ok(lookup.found.then(|| lookup.text.unwrap_or_default()))
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Launch a Chromium instance.
    ///
    /// `executable` wins over discovery; `headless` toggles the window.
    pub async fn launch(executable: Option<&Path>, headless: bool) -> CheckResult<Self> {
        let chrome_path = match executable {
            Some(p) => p.to_path_buf(),
            None => find_chromium().with_context(|| {
                format!("Chromium not found; install Chrome or set {CHROMIUM_PATH_ENV}")
            })?,
        };
        debug!(path = %chrome_path.display(), headless, "launching Chromium");

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--start-maximized");
        if headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {e}");
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> CheckResult<Box<dyn RenderContext>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> CheckResult<()> {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            warn!("browser close failed: {e}");
        }
        if let Err(e) = browser.wait().await {
            warn!("browser process wait failed: {e}");
        }
        self.handler.abort();
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> CheckResult<NavigationResult> {
        let start = Instant::now();

        // goto resolves once the load event has fired
        let result = tokio::time::timeout(Duration::from_millis(timeout_ms), self.page.goto(url))
            .await;

        let load_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_)) => {
                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationResult {
                    final_url,
                    load_time_ms,
                })
            }
            Ok(Err(e)) => Err(CheckError::Browser(format!(
                "navigation to {url} failed: {e}"
            ))),
            Err(_) => Err(CheckError::Browser(format!(
                "navigation to {url} timed out after {timeout_ms}ms"
            ))),
        }
    }

    async fn element_text(&self, xpath: &str) -> CheckResult<Option<String>> {
        let params = EvaluateParams::builder()
            .expression(lookup_script(xpath))
            .return_by_value(true)
            .build()
            .map_err(|e| CheckError::Browser(format!("failed to build lookup: {e}")))?;
        // evaluate_expression: never sniffed as a function declaration
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .with_context(|| format!("xpath lookup failed: {xpath}"))?;
        let value: serde_json::Value = result
            .into_value()
            .map_err(|e| CheckError::Browser(format!("failed to convert lookup result: {e}")))?;
        parse_lookup(value)
    }

    async fn close(self: Box<Self>) -> CheckResult<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}
