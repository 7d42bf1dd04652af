//! Run configuration: which page, which section, what to ignore.

use crate::error::CheckResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Base URL of the wiki both extractors talk to.
pub const DEFAULT_SITE: &str = "https://en.wikipedia.org";
/// Article title as it appears in the URL.
pub const DEFAULT_PAGE_TITLE: &str = "Test_automation";
/// Section compared on both sides.
pub const DEFAULT_SECTION: &str = "Test-driven development";
/// Phrases deleted during normalization.
pub const DEFAULT_BLACKLIST: &[&str] = &["citation needed"];
/// Page load budget in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Everything a run needs to know about its targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Scheme and host of the wiki, e.g. `https://en.wikipedia.org`.
    pub site: String,
    /// Page title with underscores, e.g. `Test_automation`.
    pub page_title: String,
    /// Human-readable section title, e.g. `Test-driven development`.
    pub section: String,
    /// Phrases removed from both texts after lowercasing.
    pub blacklist: Vec<String>,
    /// Timeout for page navigation and the API request.
    pub timeout_ms: u64,
    /// Run the browser without a window.
    pub headless: bool,
    /// Explicit browser executable; discovered when `None`.
    pub chromium_path: Option<PathBuf>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            section: DEFAULT_SECTION.to_string(),
            blacklist: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headless: true,
            chromium_path: None,
        }
    }
}

impl CheckConfig {
    /// Rendered article URL: `<site>/wiki/<page_title>`.
    pub fn ui_url(&self) -> CheckResult<Url> {
        let mut url = Url::parse(&self.site)?;
        url.set_path(&format!("/wiki/{}", self.page_title));
        Ok(url)
    }

    /// Plain-text extract endpoint for the same article.
    pub fn api_url(&self) -> CheckResult<Url> {
        let mut url = Url::parse(&self.site)?;
        url.set_path("/w/api.php");
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("prop", "extracts")
            .append_pair("titles", &self.page_title)
            .append_pair("explaintext", "True");
        Ok(url)
    }

    /// DOM id of the section heading (spaces become underscores).
    pub fn section_anchor(&self) -> String {
        self.section.replace(' ', "_")
    }

    /// Heading marker used by the plain-text extract, e.g. `=== Foo ===`.
    pub fn section_marker(&self) -> String {
        format!("=== {} ===", self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls_match_reference_targets() {
        let cfg = CheckConfig::default();
        assert_eq!(
            cfg.ui_url().unwrap().as_str(),
            "https://en.wikipedia.org/wiki/Test_automation"
        );
        assert_eq!(
            cfg.api_url().unwrap().as_str(),
            "https://en.wikipedia.org/w/api.php?action=query&format=json&prop=extracts&titles=Test_automation&explaintext=True"
        );
    }

    #[test]
    fn test_section_anchor_and_marker() {
        let cfg = CheckConfig {
            section: "Unit testing basics".into(),
            ..CheckConfig::default()
        };
        assert_eq!(cfg.section_anchor(), "Unit_testing_basics");
        assert_eq!(cfg.section_marker(), "=== Unit testing basics ===");
    }

    #[test]
    fn test_substituted_site() {
        let cfg = CheckConfig {
            site: "http://127.0.0.1:8080".into(),
            ..CheckConfig::default()
        };
        assert_eq!(
            cfg.ui_url().unwrap().as_str(),
            "http://127.0.0.1:8080/wiki/Test_automation"
        );
        assert!(cfg
            .api_url()
            .unwrap()
            .as_str()
            .starts_with("http://127.0.0.1:8080/w/api.php?"));
    }

    #[test]
    fn test_invalid_site_is_config_error() {
        let cfg = CheckConfig {
            site: "not a url".into(),
            ..CheckConfig::default()
        };
        let err = cfg.ui_url().unwrap_err();
        assert!(err.is_environment());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
