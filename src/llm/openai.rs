//! OpenAI LLM Provider implementation via Rig
//!
//! Used for search query generation.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai::Client;
use tracing::debug;

use super::config::LLMConfig;
use super::message::{extract_system_preamble, last_user_prompt, Message};
use super::provider::{merge_config, LLMProvider};
use crate::error::ResearchError;

/// OpenAI chat model client.
///
/// Reads `OPENAI_API_KEY` from the environment.
pub struct OpenAIProvider {
    client: Client,
    default_config: LLMConfig,
}

impl OpenAIProvider {
    pub fn from_env() -> Result<Self, ResearchError> {
        Self::from_env_with_model("gpt-4.1")
    }

    pub fn from_env_with_model(model: impl Into<String>) -> Result<Self, ResearchError> {
        let model = model.into();
        if model.is_empty() {
            return Err(ResearchError::Config(
                "OpenAI model name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            client: Client::from_env(),
            default_config: LLMConfig::new(model),
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(
        &self,
        messages: &[Message],
        config: Option<&LLMConfig>,
    ) -> Result<String, ResearchError> {
        let config = merge_config(&self.default_config, config);
        debug!(model = %config.model, messages = messages.len(), "OpenAI completion");

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
            .map_err(|e| ResearchError::Llm(format!("OpenAI completion failed: {}", e)))
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_is_llm_provider() {
        fn assert_provider<T: LLMProvider>() {}
        assert_provider::<OpenAIProvider>();
    }

    #[test]
    fn test_openai_provider_rejects_empty_model() {
        assert!(matches!(
            OpenAIProvider::from_env_with_model(""),
            Err(ResearchError::Config(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires OPENAI_API_KEY environment variable
    async fn test_openai_provider_complete() {
        let provider = OpenAIProvider::from_env().unwrap();
        let messages = vec![Message::user("Say 'hello' and nothing else.")];

        let response = provider.complete(&messages, None).await.unwrap();

        assert!(response.to_lowercase().contains("hello"));
    }
}
