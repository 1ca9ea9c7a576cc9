//! Gemini LLM Provider implementation via Rig
//!
//! Used for entity and timeline extraction.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::gemini::Client;
use tracing::debug;

use super::config::LLMConfig;
use super::message::{extract_system_preamble, last_user_prompt, Message};
use super::provider::{merge_config, LLMProvider};
use crate::error::ResearchError;

/// Gemini client. Reads `GEMINI_API_KEY` from the environment.
pub struct GeminiProvider {
    client: Client,
    default_config: LLMConfig,
}

impl GeminiProvider {
    pub fn from_env() -> Result<Self, ResearchError> {
        Self::from_env_with_model("gemini-2.0-flash")
    }

    pub fn from_env_with_model(model: impl Into<String>) -> Result<Self, ResearchError> {
        let model = model.into();
        if model.is_empty() {
            return Err(ResearchError::Config(
                "Gemini model name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            client: Client::from_env(),
            default_config: LLMConfig::new(model),
        })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        config: Option<&LLMConfig>,
    ) -> Result<String, ResearchError> {
        let config = merge_config(&self.default_config, config);
        debug!(model = %config.model, messages = messages.len(), "Gemini completion");

        let mut agent_builder = self.client.agent(&config.model);

        if let Some(preamble) = extract_system_preamble(messages) {
            agent_builder = agent_builder.preamble(&preamble);
        }
        if let Some(temp) = config.temperature {
            agent_builder = agent_builder.temperature(temp);
        }
        if let Some(max_tokens) = config.max_tokens {
            agent_builder = agent_builder.max_tokens(max_tokens);
        }

        let agent = agent_builder.build();
        let prompt = last_user_prompt(messages);

        agent
            .prompt(&prompt)
            .await
            .map_err(|e| ResearchError::Llm(format!("Gemini completion failed: {}", e)))
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_is_llm_provider() {
        fn assert_provider<T: LLMProvider>() {}
        assert_provider::<GeminiProvider>();
    }

    #[test]
    fn test_gemini_provider_rejects_empty_model() {
        assert!(GeminiProvider::from_env_with_model("").is_err());
    }
}
