//! The two independent text sources being compared.

pub mod api;
pub mod ui;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a piece of text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Ui,
    Api,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Ui => f.write_str("UI"),
            Origin::Api => f.write_str("API"),
        }
    }
}

/// Text exactly as a source returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawText {
    pub origin: Origin,
    pub text: String,
}

impl RawText {
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }
}

pub use api::{extract_section, fetch_api_text};
pub use ui::{extract_ui_text, SectionXPaths};
