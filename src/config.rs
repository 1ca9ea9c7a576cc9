//! # Configuration Module
//!
//! Loads the research agent's settings from environment variables, with an
//! optional `.env` file for local development.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::research::{WorkflowSettings, DEFAULT_MAX_DEPTH};
use crate::tools::{PerplexitySearch, DEFAULT_TIMEOUT_SECS};

/// API keys every run needs, checked together before anything starts.
pub const REQUIRED_CREDENTIALS: [&str; 4] = [
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "GEMINI_API_KEY",
    "PERPLEXITY_API_KEY",
];

// =============================================================================
// CONFIGURATION STRUCT
// =============================================================================
/// Main configuration for the due-diligence agent.
///
/// API keys for the model vendors are read by the rig clients themselves;
/// only the Perplexity key is held here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model used to generate search queries (OpenAI)
    pub query_model: String,

    /// Model used for entity extraction (Gemini)
    pub extraction_model: String,

    /// Model used for risk scoring and the final report (Anthropic)
    pub analysis_model: String,

    pub perplexity_api_key: Option<String>,
    pub perplexity_model: String,
    pub perplexity_api_base: String,

    /// Perplexity recency window: day, week, month or year
    pub search_recency_filter: String,

    /// Search/extract/risk iterations per run
    pub max_search_depth: usize,

    pub max_queries_per_search: usize,
    pub max_results_per_query: usize,

    /// Per-request timeout for the search provider, in seconds
    pub search_timeout_secs: u64,

    /// Log filter directive for the application (`RUST_LOG` syntax)
    pub log_level: String,
}

// =============================================================================
// DEFAULT IMPLEMENTATION
// =============================================================================
impl Default for Config {
    fn default() -> Self {
        Self {
            query_model: "gpt-4.1".to_string(),
            extraction_model: "gemini-2.0-flash".to_string(),
            analysis_model: "claude-sonnet-4-20250514".to_string(),
            perplexity_api_key: None,
            perplexity_model: "sonar-pro".to_string(),
            perplexity_api_base: "https://api.perplexity.ai".to_string(),
            search_recency_filter: "month".to_string(),
            max_search_depth: DEFAULT_MAX_DEPTH,
            max_queries_per_search: 8,
            max_results_per_query: 3,
            search_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

// =============================================================================
// CONFIGURATION LOADING
// =============================================================================
impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Example
    /// ```no_run
    /// use diligence_agent::Config;
    ///
    /// let config = Config::from_env()?;
    /// println!("Analysis model: {}", config.analysis_model);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = Config::default();

        if let Ok(val) = env::var("OPENAI_MODEL") {
            config.query_model = val;
        }

        if let Ok(val) = env::var("GEMINI_MODEL") {
            config.extraction_model = val;
        }

        if let Ok(val) = env::var("ANTHROPIC_MODEL") {
            config.analysis_model = val;
        }

        if let Ok(val) = env::var("PERPLEXITY_API_KEY") {
            if !val.trim().is_empty() {
                config.perplexity_api_key = Some(val);
            }
        }

        if let Ok(val) = env::var("PERPLEXITY_MODEL") {
            config.perplexity_model = val;
        }

        if let Ok(val) = env::var("PERPLEXITY_API_BASE") {
            config.perplexity_api_base = val;
        }

        if let Ok(val) = env::var("SEARCH_RECENCY_FILTER") {
            config.search_recency_filter = val;
        }

        if let Ok(val) = env::var("MAX_SEARCH_DEPTH") {
            config.max_search_depth = val
                .parse()
                .context("MAX_SEARCH_DEPTH must be a non-negative integer")?;
        }

        if let Ok(val) = env::var("MAX_QUERIES_PER_SEARCH") {
            config.max_queries_per_search = val
                .parse()
                .context("MAX_QUERIES_PER_SEARCH must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("MAX_RESULTS_PER_QUERY") {
            config.max_results_per_query = val
                .parse()
                .context("MAX_RESULTS_PER_QUERY must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("SEARCH_TIMEOUT_SECS") {
            config.search_timeout_secs = val
                .parse()
                .context("SEARCH_TIMEOUT_SECS must be a whole number of seconds")?;
        }

        if let Ok(val) = env::var("RUST_LOG") {
            config.log_level = val;
        }

        Ok(config)
    }

    /// Validate the configuration before any network call is made.
    pub fn validate(&self) -> Result<()> {
        if self.max_queries_per_search == 0 {
            anyhow::bail!("MAX_QUERIES_PER_SEARCH must be at least 1");
        }

        if self.max_results_per_query == 0 {
            anyhow::bail!("MAX_RESULTS_PER_QUERY must be at least 1");
        }

        if self.search_timeout_secs == 0 {
            anyhow::bail!("SEARCH_TIMEOUT_SECS must be at least 1");
        }

        for (name, value) in [
            ("OPENAI_MODEL", &self.query_model),
            ("GEMINI_MODEL", &self.extraction_model),
            ("ANTHROPIC_MODEL", &self.analysis_model),
            ("PERPLEXITY_MODEL", &self.perplexity_model),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} cannot be empty");
            }
        }

        Ok(())
    }

    /// Fail with every missing API key named at once.
    pub fn require_credentials(&self) -> Result<()> {
        let missing = missing_credentials(|name| match name {
            "PERPLEXITY_API_KEY" => self.perplexity_api_key.clone(),
            other => env::var(other).ok(),
        });

        if !missing.is_empty() {
            anyhow::bail!("Missing credentials: {}", missing.join(", "));
        }
        Ok(())
    }

    /// Filter directive for the log subscriber; `--verbose` forces debug.
    pub fn log_filter(&self, verbose: bool) -> &str {
        if verbose {
            "debug"
        } else {
            self.log_level.as_str()
        }
    }

    /// Loop settings derived from this configuration.
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings::default()
            .with_max_queries_per_search(self.max_queries_per_search)
            .with_max_results_per_query(self.max_results_per_query)
    }

    /// Perplexity client configured from this configuration.
    pub fn search_provider(&self) -> Result<PerplexitySearch> {
        let api_key = self
            .perplexity_api_key
            .clone()
            .context("PERPLEXITY_API_KEY is not set")?;

        Ok(PerplexitySearch::new(api_key)
            .with_base_url(self.perplexity_api_base.as_str())
            .with_model(self.perplexity_model.as_str())
            .with_recency_filter(self.search_recency_filter.as_str())
            .with_timeout(Duration::from_secs(self.search_timeout_secs)))
    }
}

/// Names from [`REQUIRED_CREDENTIALS`] for which `lookup` has no non-blank value.
pub fn missing_credentials<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_CREDENTIALS
        .into_iter()
        .filter(|name| lookup(name).map_or(true, |value| value.trim().is_empty()))
        .collect()
}

// =============================================================================
// UNIT TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.query_model, "gpt-4.1");
        assert_eq!(config.extraction_model, "gemini-2.0-flash");
        assert_eq!(config.analysis_model, "claude-sonnet-4-20250514");
        assert_eq!(config.perplexity_model, "sonar-pro");
        assert_eq!(config.search_recency_filter, "month");
        assert_eq!(config.max_search_depth, 3);
        assert_eq!(config.max_queries_per_search, 8);
        assert_eq!(config.max_results_per_query, 3);
        assert_eq!(config.search_timeout_secs, 30);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_queries() {
        let mut config = Config::default();
        config.max_queries_per_search = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.search_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.analysis_model = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_MODEL"));
    }

    #[test]
    fn test_missing_credentials_lists_all() {
        let missing = missing_credentials(|name| match name {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "GEMINI_API_KEY" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(
            missing,
            vec!["ANTHROPIC_API_KEY", "GEMINI_API_KEY", "PERPLEXITY_API_KEY"]
        );
    }

    #[test]
    fn test_no_missing_credentials() {
        let missing = missing_credentials(|_| Some("key".to_string()));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_workflow_settings_follow_config() {
        let mut config = Config::default();
        config.max_queries_per_search = 4;
        config.max_results_per_query = 2;

        let settings = config.workflow_settings();

        assert_eq!(settings.max_queries_per_search, 4);
        assert_eq!(settings.max_results_per_query, 2);
        assert_eq!(settings.iteration_cap, 100);
    }

    #[test]
    fn test_log_filter_uses_configured_level() {
        let config = Config {
            log_level: "diligence_agent=trace,reqwest=warn".to_string(),
            ..Config::default()
        };

        assert_eq!(config.log_filter(false), "diligence_agent=trace,reqwest=warn");
        assert_eq!(config.log_filter(true), "debug");
        assert_eq!(Config::default().log_filter(false), "info");
    }

    #[test]
    fn test_search_provider_requires_key() {
        let config = Config::default();
        assert!(config.search_provider().is_err());

        let config = Config {
            perplexity_api_key: Some("pplx-test".to_string()),
            ..Config::default()
        };
        assert!(config.search_provider().is_ok());
    }
}
