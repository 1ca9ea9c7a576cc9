//! # Tools Module
//!
//! The search side of the research loop: a [`SearchProvider`] trait, the
//! Perplexity implementation, and helpers that run and format a batch of
//! queries for the findings log.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::SearchError;

/// Default timeout for a single search request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_API_BASE: &str = "https://api.perplexity.ai";

/// Characters of the answer text kept as a result snippet
const SNIPPET_CHARS: usize = 500;

const SEARCH_SYSTEM_PROMPT: &str =
    "You are a web search assistant. Provide factual information with sources.";

// =============================================================================
// SEARCH RESULT
// =============================================================================
/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Source identifier, normally a URL
    pub url: String,

    /// Title of the result
    pub title: String,

    /// Snippet of the content
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }

    /// Placeholder standing in for a failed query.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", "Search Error", message)
    }

    /// Whether this is a failed-query placeholder.
    pub fn is_error(&self) -> bool {
        self.url == "error"
    }
}

// =============================================================================
// SEARCH PROVIDER TRAIT
// =============================================================================
/// An information-retrieval backend.
///
/// `search` is infallible by contract: a provider failure is reported as a
/// single [`SearchResult::error`] record, never as an `Err`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

// =============================================================================
// PERPLEXITY
// =============================================================================
/// Request body for the Perplexity chat completions API
#[derive(Debug, Serialize)]
struct PerplexityRequest<'a> {
    model: &'a str,
    messages: Vec<PerplexityMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    return_citations: bool,
    search_recency_filter: &'a str,
}

#[derive(Debug, Serialize)]
struct PerplexityMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the Perplexity API. Only the fields we read.
#[derive(Debug, Default, Deserialize)]
struct PerplexityResponse {
    #[serde(default)]
    choices: Vec<PerplexityChoice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PerplexityChoice {
    #[serde(default)]
    message: PerplexityAnswer,
}

#[derive(Debug, Default, Deserialize)]
struct PerplexityAnswer {
    #[serde(default)]
    content: String,
}

impl PerplexityResponse {
    fn answer(&self) -> &str {
        self.choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default()
    }

    /// Turn citations into results; fall back to the answer itself.
    fn into_results(self, max_results: usize) -> Vec<SearchResult> {
        let snippet: String = self.answer().chars().take(SNIPPET_CHARS).collect();

        let results: Vec<SearchResult> = self
            .citations
            .iter()
            .take(max_results)
            .enumerate()
            .map(|(i, citation)| {
                let text = if i == 0 { snippet.clone() } else { String::new() };
                SearchResult::new(citation, format!("Source {}", i + 1), text)
            })
            .collect();

        if results.is_empty() {
            debug!("No citations, creating result from content");
            return vec![SearchResult::new("perplexity_response", "Search Result", snippet)];
        }
        results
    }
}

/// Web search through Perplexity's online models.
///
/// # Example
/// ```ignore
/// let search = PerplexitySearch::new("pplx-...").with_model("sonar-pro");
/// let results = search.search("Jane Doe board memberships", 3).await;
/// ```
#[derive(Debug, Clone)]
pub struct PerplexitySearch {
    api_key: String,
    base_url: String,
    model: String,
    recency_filter: String,
    client: Client,
    timeout: Duration,
}

impl PerplexitySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: "sonar-pro".to_string(),
            recency_filter: "month".to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_recency_filter(mut self, filter: impl Into<String>) -> Self {
        self.recency_filter = filter.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One request, no retries.
    async fn try_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let request = PerplexityRequest {
            model: &self.model,
            messages: vec![
                PerplexityMessage {
                    role: "system",
                    content: SEARCH_SYSTEM_PROMPT,
                },
                PerplexityMessage {
                    role: "user",
                    content: query,
                },
            ],
            temperature: 0.2,
            max_tokens: 1000,
            return_citations: true,
            search_recency_filter: &self.recency_filter,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => SearchError::BadRequest(error_text),
                401 => SearchError::Unauthorized,
                429 => SearchError::RateLimited,
                code @ 500..=599 => SearchError::ServerError(code, error_text),
                code => SearchError::HttpError(code, error_text),
            });
        }

        let body: PerplexityResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!(
            citations = body.citations.len(),
            content_len = body.answer().len(),
            "Perplexity responded"
        );

        Ok(body.into_results(max_results))
    }
}

#[async_trait]
impl SearchProvider for PerplexitySearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        info!(query = %query, "Performing web search");

        match self.try_search(query, max_results).await {
            Ok(results) => {
                info!(query = %query, count = results.len(), "Search completed");
                results
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                vec![SearchResult::error(e.to_string())]
            }
        }
    }

    fn name(&self) -> &str {
        "perplexity"
    }
}

// =============================================================================
// BATCH SEARCH AND FORMATTING
// =============================================================================
/// Results returned for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResults {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Run each distinct query once, sequentially, preserving order.
pub async fn batch_search<S>(provider: &S, queries: &[String], max_results: usize) -> Vec<QueryResults>
where
    S: SearchProvider + ?Sized,
{
    let mut seen = HashSet::new();
    let mut batch = Vec::with_capacity(queries.len());

    for query in queries {
        if !seen.insert(query.as_str()) {
            debug!(query = %query, "Skipping duplicate query");
            continue;
        }
        let results = provider.search(query, max_results).await;
        batch.push(QueryResults {
            query: query.clone(),
            results,
        });
    }

    batch
}

/// Render results as readable text for model consumption.
pub fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("\n[{}] {}\nURL: {}\n{}", i + 1, r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}
