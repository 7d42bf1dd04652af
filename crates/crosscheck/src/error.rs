//! Error types for a crosscheck run.

/// Everything that can end a run other than a pass.
///
/// Element, section, network and browser failures are environment errors:
/// the run could not produce two texts to compare. `Mismatch` is the only
/// genuine check failure.
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("element not found: {xpath}")]
    ElementNotFound { xpath: String },

    #[error("section marker not found in API response: {marker}")]
    MissingSection { marker: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unique word counts differ: ui={ui}, api={api}")]
    Mismatch { ui: usize, api: usize },
}

impl CheckError {
    /// True when the run aborted before a comparison could be made.
    pub fn is_environment(&self) -> bool {
        !matches!(self, CheckError::Mismatch { .. })
    }

    /// Process exit code for this error: 1 for a mismatch, 2 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_environment() {
            2
        } else {
            1
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        CheckError::Network(e.to_string())
    }
}

impl From<anyhow::Error> for CheckError {
    fn from(e: anyhow::Error) -> Self {
        CheckError::Browser(format!("{e:#}"))
    }
}

impl From<url::ParseError> for CheckError {
    fn from(e: url::ParseError) -> Self {
        CheckError::Config(e.to_string())
    }
}

/// Convenience alias.
pub type CheckResult<T> = Result<T, CheckError>;
