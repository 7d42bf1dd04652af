//! Section text from the plain-text extract API.
//!
//! The response is JSON, but the section is cut out of the raw body by
//! string splitting rather than by decoding it. This keeps the API side
//! as close as possible to "what the server sent", escape sequences and
//! all; only literal `\n` escapes are dropped.

use super::{Origin, RawText};
use crate::acquisition::Fetcher;
use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Where the section text stops: the literal `[===|==]`, or any `=` or `|`.
fn section_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[===\|==\]|[=|]").expect("boundary regex is valid"))
}

/// Split pieces with trailing empty pieces dropped.
///
/// A marker or boundary at the very end of the input therefore yields no
/// piece after it.
fn trim_trailing_empty(mut pieces: Vec<&str>) -> Vec<&str> {
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces
}

/// Cut the text of `section` out of a raw extract body.
///
/// Returns `"=== <section> === <text>"`. Line breaks in the body are
/// discarded before searching, so the text is everything between the
/// marker and the next boundary on the joined body. A marker with nothing
/// but boundaries (or nothing at all) after it counts as missing.
pub fn extract_section(body: &str, section: &str) -> CheckResult<String> {
    let joined: String = body.lines().collect();
    let marker = format!("=== {section} ===");
    let missing = || CheckError::MissingSection {
        marker: marker.clone(),
    };

    let pieces = trim_trailing_empty(joined.split(marker.as_str()).collect());
    let after = pieces.get(1).copied().ok_or_else(missing)?;

    let regions = trim_trailing_empty(section_boundary().split(after).collect());
    let region = regions.first().copied().ok_or_else(missing)?;
    let region = region.replace("\\n", "");

    Ok(format!("{marker} {region}"))
}

/// Fetch the article extract and return the configured section.
pub async fn fetch_api_text(fetcher: &dyn Fetcher, config: &CheckConfig) -> CheckResult<RawText> {
    let url = config.api_url()?;
    let body = fetcher.fetch(url.as_str()).await?;
    info!(%url, bytes = body.len(), "extract fetched");

    let text = extract_section(&body, &config.section)?;
    debug!(chars = text.len(), "section cut from extract");
    Ok(RawText::new(Origin::Api, text))
}
