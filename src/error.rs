//! Error types for FogBugz API operations.

use thiserror::Error;

/// Errors that can occur while talking to a FogBugz installation.
#[derive(Debug, Error)]
pub enum FogbugzError {
    /// Configuration is missing or incomplete.
    #[error("FogBugz configuration required: {0}")]
    ConfigMissing(String),

    /// The endpoint URI could not be assembled.
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("FogBugz API error: HTTP {status}")]
    Api { status: u16, body: String },

    /// The response body was not a usable XML document.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Logon did not yield a token.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for FogbugzError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for FogBugz operations.
pub type Result<T> = core::result::Result<T, FogbugzError>;
