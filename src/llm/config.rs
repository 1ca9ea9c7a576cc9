//! Per-call generation settings for the model clients.

use serde::{Deserialize, Serialize};

/// Model, temperature and output budget for one kind of model call.
///
/// # Example
///
/// ```
/// use diligence_agent::llm::LLMConfig;
///
/// let config = LLMConfig::new("gpt-4.1")
///     .with_temperature(0.7)
///     .with_max_tokens(1000);
///
/// assert_eq!(config.model, "gpt-4.1");
/// assert_eq!(config.max_tokens, Some(1000));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Model identifier. Empty means "use the provider default".
    pub model: String,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f64>,
    /// Maximum tokens to generate in the response
    pub max_tokens: Option<u64>,
}

impl LLMConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u64) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_builder() {
        let config = LLMConfig::new("claude-sonnet-4-20250514")
            .with_temperature(0.3)
            .with_max_tokens(3000);

        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_tokens, Some(3000));
    }

    #[test]
    fn test_llm_config_default_is_unset() {
        let config = LLMConfig::default();
        assert!(config.model.is_empty());
        assert!(config.temperature.is_none());
        assert!(config.max_tokens.is_none());
    }
}
