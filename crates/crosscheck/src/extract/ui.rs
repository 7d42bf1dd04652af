//! Section text as rendered in the browser.
//!
//! The article body lives in `div#mw-content-text`. A section heading
//! carries the section title (spaces as underscores) as its id, and the
//! section's first paragraph is the first `<p>` after the heading's wrapper.
//! Any of these missing is fatal: there is no fallback lookup.

use super::{Origin, RawText};
use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use crate::renderer::RenderContext;
use tracing::{debug, info};

/// XPath of the article content container.
pub const CONTENT_CONTAINER_XPATH: &str = "//div[@id='mw-content-text']";

/// The two lookups the UI extractor performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionXPaths {
    pub heading: String,
    pub paragraph: String,
}

impl SectionXPaths {
    /// Build lookups for the heading whose id is `anchor`.
    pub fn for_anchor(anchor: &str) -> Self {
        let heading = format!(
            "{CONTENT_CONTAINER_XPATH}//*[@id={}]",
            xpath_literal(anchor)
        );
        let paragraph = format!("({heading}/parent::*/following-sibling::p)[1]");
        Self { heading, paragraph }
    }
}

/// Quote `s` as an XPath 1.0 string literal.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{s}'")
    } else if !s.contains('"') {
        format!("\"{s}\"")
    } else {
        let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

async fn required_text(ctx: &dyn RenderContext, xpath: &str) -> CheckResult<String> {
    match ctx.element_text(xpath).await? {
        Some(text) => Ok(text),
        None => Err(CheckError::ElementNotFound {
            xpath: xpath.to_string(),
        }),
    }
}

/// Navigate to the article and return `"<heading> <first paragraph>"`.
pub async fn extract_ui_text(
    ctx: &mut dyn RenderContext,
    config: &CheckConfig,
) -> CheckResult<RawText> {
    let url = config.ui_url()?;
    let nav = ctx.navigate(url.as_str(), config.timeout_ms).await?;
    info!(url = %nav.final_url, load_ms = nav.load_time_ms, "page loaded");

    let xpaths = SectionXPaths::for_anchor(&config.section_anchor());
    let heading = required_text(ctx, &xpaths.heading).await?;
    let paragraph = required_text(ctx, &xpaths.paragraph).await?;
    debug!(heading = %heading, paragraph_len = paragraph.len(), "section located");

    Ok(RawText::new(Origin::Ui, format!("{heading} {paragraph}")))
}
