//! # Error Types
//!
//! Two tiers of errors flow through the agent:
//! - [`SearchError`] and [`ResearchError::Llm`] describe expected failures of
//!   external services. Stages absorb them and continue with degraded data.
//! - The remaining [`ResearchError`] variants describe failures of the
//!   controller itself. They abort the whole run.

use thiserror::Error;

/// Typed errors for the search provider HTTP API.
///
/// These never leave [`crate::tools::SearchProvider::search`]; the provider
/// turns them into a placeholder result instead.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized - check API key")]
    Unauthorized,

    #[error("Rate limited - too many requests")]
    RateLimited,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else if e.is_connect() {
            SearchError::Connection(e.to_string())
        } else if e.is_decode() {
            SearchError::ParseError(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }
}

/// Errors raised by model clients and by the research controller.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Iteration limit of {limit} stage transitions exceeded")]
    IterationLimit { limit: usize },

    #[error("Research state invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Research run panicked: {0}")]
    Panicked(String),
}

impl ResearchError {
    /// Whether a stage may swallow this error and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ResearchError::Llm(_))
    }
}
