//! The check itself: UI text vs API text, compared by vocabulary size.
//!
//! A run walks a fixed sequence of stages and never branches or retries:
//!
//! ```text
//! Init -> BrowserReady -> UiExtracted -> ApiExtracted -> Compared -> Done
//!            \______________________________________________/
//!                              any failure -> Aborted
//! ```
//!
//! The browser context and the renderer are released on every exit path
//! once `BrowserReady` has been reached.

use crate::acquisition::Fetcher;
use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use crate::extract::{self, RawText};
use crate::renderer::{RenderContext, Renderer};
use crate::text::{normalize, WordCount};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    BrowserReady,
    UiExtracted,
    ApiExtracted,
    Compared,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::BrowserReady => "browser_ready",
            Stage::UiExtracted => "ui_extracted",
            Stage::ApiExtracted => "api_extracted",
            Stage::Compared => "compared",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Word tables from both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub ui: WordCount,
    pub api: WordCount,
}

impl Comparison {
    /// Normalize and count both texts with the same blacklist.
    pub fn from_texts(ui: &RawText, api: &RawText, blacklist: &[String]) -> Self {
        Self {
            ui: WordCount::from_text(&normalize(&ui.text, blacklist)),
            api: WordCount::from_text(&normalize(&api.text, blacklist)),
        }
    }

    /// Sizes match. Which words they are is not compared.
    pub fn passed(&self) -> bool {
        self.ui.unique() == self.api.unique()
    }

    /// `passed()` as a result, carrying both sizes on failure.
    pub fn verify(&self) -> CheckResult<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(CheckError::Mismatch {
                ui: self.ui.unique(),
                api: self.api.unique(),
            })
        }
    }
}

/// One run of the check against a renderer and a fetcher.
pub struct Scenario<'a> {
    config: &'a CheckConfig,
    renderer: &'a dyn Renderer,
    fetcher: &'a dyn Fetcher,
    history: Vec<Stage>,
}

impl<'a> Scenario<'a> {
    pub fn new(
        config: &'a CheckConfig,
        renderer: &'a dyn Renderer,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            config,
            renderer,
            fetcher,
            history: vec![Stage::Init],
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        *self.history.last().unwrap_or(&Stage::Init)
    }

    /// Every stage entered so far, in order.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage(), to = %stage, "stage transition");
        self.history.push(stage);
    }

    /// Run to completion and return both word tables.
    ///
    /// Extraction failures come back as environment errors. A size
    /// mismatch is not an error here; see [`Comparison::verify`].
    pub async fn run(&mut self) -> CheckResult<Comparison> {
        let mut ctx = match self.renderer.new_context().await {
            Ok(ctx) => ctx,
            Err(e) => {
                self.enter(Stage::Aborted);
                self.release(None).await;
                return Err(e);
            }
        };
        self.enter(Stage::BrowserReady);

        let result = self.compare(ctx.as_mut()).await;
        match &result {
            Ok(cmp) => {
                self.enter(Stage::Done);
                info!(
                    ui_unique = cmp.ui.unique(),
                    api_unique = cmp.api.unique(),
                    passed = cmp.passed(),
                    "comparison finished"
                );
            }
            Err(e) => {
                self.enter(Stage::Aborted);
                warn!(error = %e, "run aborted");
            }
        }

        self.release(Some(ctx)).await;
        result
    }

    async fn compare(&mut self, ctx: &mut dyn RenderContext) -> CheckResult<Comparison> {
        let ui = extract::extract_ui_text(ctx, self.config).await?;
        self.enter(Stage::UiExtracted);

        let api = extract::fetch_api_text(self.fetcher, self.config).await?;
        self.enter(Stage::ApiExtracted);

        let cmp = Comparison::from_texts(&ui, &api, &self.config.blacklist);
        self.enter(Stage::Compared);
        Ok(cmp)
    }

    /// Close the tab and the browser. Failures here are logged, never
    /// allowed to replace the run's own outcome.
    async fn release(&self, ctx: Option<Box<dyn RenderContext>>) {
        if let Some(ctx) = ctx {
            if let Err(e) = ctx.close().await {
                warn!(error = %e, "failed to close browser context");
            }
        }
        if let Err(e) = self.renderer.shutdown().await {
            warn!(error = %e, "failed to shut down renderer");
        }
    }
}

/// Build and run a [`Scenario`] in one call.
pub async fn run_check(
    config: &CheckConfig,
    renderer: &dyn Renderer,
    fetcher: &dyn Fetcher,
) -> CheckResult<Comparison> {
    Scenario::new(config, renderer, fetcher).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Origin, SectionXPaths};
    use crate::renderer::fixture::FixtureRenderer;
    use async_trait::async_trait;

    const PAGE: &str = "https://en.wikipedia.org/wiki/Test_automation";

    struct StaticFetcher(Option<&'static str>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> CheckResult<String> {
            match self.0 {
                Some(body) => Ok(body.to_string()),
                None => Err(CheckError::Network(format!("GET {url}: connection refused"))),
            }
        }
    }

    fn renderer_with(paragraph: &str) -> FixtureRenderer {
        let x = SectionXPaths::for_anchor("Test-driven_development");
        FixtureRenderer::new().with_page(
            PAGE,
            [
                (x.heading, "Test-driven development".to_string()),
                (x.paragraph, paragraph.to_string()),
            ],
        )
    }

    #[test]
    fn test_comparison_counts_unique_words_only() {
        let ui = RawText::new(Origin::Ui, "a a b c");
        let api = RawText::new(Origin::Api, "x y z z z");
        let cmp = Comparison::from_texts(&ui, &api, &[]);
        // Disjoint vocabularies of equal size still pass.
        assert!(cmp.passed());
        assert!(cmp.verify().is_ok());
    }

    #[test]
    fn test_verify_reports_sizes() {
        let ui = RawText::new(Origin::Ui, "one two");
        let api = RawText::new(Origin::Api, "one two three");
        let err = Comparison::from_texts(&ui, &api, &[]).verify().unwrap_err();
        assert!(matches!(err, CheckError::Mismatch { ui: 2, api: 3 }));
    }

    #[tokio::test]
    async fn test_successful_run_walks_every_stage() {
        let renderer = renderer_with("Write the test first [citation needed].");
        let fetcher = StaticFetcher(Some(
            "=== Test-driven development ===\\nWrite the test first.\\n=",
        ));
        let config = CheckConfig::default();
        let mut scenario = Scenario::new(&config, &renderer, &fetcher);

        let cmp = scenario.run().await.unwrap();
        assert!(cmp.passed());
        assert_eq!(cmp.ui.unique(), 6);
        assert_eq!(
            scenario.history(),
            &[
                Stage::Init,
                Stage::BrowserReady,
                Stage::UiExtracted,
                Stage::ApiExtracted,
                Stage::Compared,
                Stage::Done,
            ]
        );
        assert!(renderer.is_shut_down());
        assert_eq!(renderer.active_contexts(), 0);
    }

    #[tokio::test]
    async fn test_mismatch_still_releases_browser() {
        let renderer = renderer_with("Write the test first.");
        let fetcher = StaticFetcher(Some(
            "=== Test-driven development === Write the test first, always.=",
        ));
        let config = CheckConfig::default();
        let cmp = run_check(&config, &renderer, &fetcher).await.unwrap();
        assert!(!cmp.passed());
        assert!(matches!(
            cmp.verify(),
            Err(CheckError::Mismatch { ui: 6, api: 7 })
        ));
        assert!(renderer.is_shut_down());
        assert_eq!(renderer.active_contexts(), 0);
    }

    #[tokio::test]
    async fn test_ui_failure_aborts_before_api() {
        let renderer = FixtureRenderer::new().with_page(PAGE, Vec::<(String, String)>::new());
        let fetcher = StaticFetcher(None);
        let config = CheckConfig::default();
        let mut scenario = Scenario::new(&config, &renderer, &fetcher);

        let err = scenario.run().await.unwrap_err();
        assert!(matches!(err, CheckError::ElementNotFound { .. }));
        assert_eq!(
            scenario.history(),
            &[Stage::Init, Stage::BrowserReady, Stage::Aborted]
        );
        assert!(renderer.is_shut_down());
        assert_eq!(renderer.active_contexts(), 0);
    }

    #[tokio::test]
    async fn test_network_failure_aborts_after_ui() {
        let renderer = renderer_with("Anything.");
        let fetcher = StaticFetcher(None);
        let config = CheckConfig::default();
        let mut scenario = Scenario::new(&config, &renderer, &fetcher);

        let err = scenario.run().await.unwrap_err();
        assert!(matches!(err, CheckError::Network(_)));
        assert_eq!(scenario.stage(), Stage::Aborted);
        assert!(scenario.history().contains(&Stage::UiExtracted));
        assert!(!scenario.history().contains(&Stage::ApiExtracted));
        assert!(renderer.is_shut_down());
    }

    #[tokio::test]
    async fn test_missing_section_aborts() {
        let renderer = renderer_with("Anything.");
        let fetcher = StaticFetcher(Some("{\"extract\":\"no sections\"}"));
        let config = CheckConfig::default();
        let err = run_check(&config, &renderer, &fetcher).await.unwrap_err();
        assert!(matches!(err, CheckError::MissingSection { .. }));
        assert!(err.is_environment());
        assert!(renderer.is_shut_down());
    }

    #[tokio::test]
    async fn test_context_failure_aborts_and_shuts_down() {
        let renderer = FixtureRenderer::new();
        renderer.shutdown().await.unwrap();
        let fetcher = StaticFetcher(None);
        let config = CheckConfig::default();
        let mut scenario = Scenario::new(&config, &renderer, &fetcher);

        let err = scenario.run().await.unwrap_err();
        assert!(matches!(err, CheckError::Browser(_)));
        assert_eq!(scenario.history(), &[Stage::Init, Stage::Aborted]);
        assert_eq!(renderer.contexts_opened(), 0);
    }
}
