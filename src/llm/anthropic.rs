//! Anthropic (Claude) LLM Provider implementation via Rig
//!
//! Used for risk scoring and the final report.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::anthropic::Client;
use tracing::debug;

use super::config::LLMConfig;
use super::message::{extract_system_preamble, last_user_prompt, Message};
use super::provider::{merge_config, LLMProvider};
use crate::error::ResearchError;

/// Anthropic requires max_tokens on every request.
const DEFAULT_MAX_TOKENS: u64 = 4096;

/// Claude client. Reads `ANTHROPIC_API_KEY` from the environment.
pub struct AnthropicProvider {
    client: Client,
    default_config: LLMConfig,
}

impl AnthropicProvider {
    pub fn from_env() -> Result<Self, ResearchError> {
        Self::from_env_with_model("claude-sonnet-4-20250514")
    }

    pub fn from_env_with_model(model: impl Into<String>) -> Result<Self, ResearchError> {
        let model = model.into();
        if model.is_empty() {
            return Err(ResearchError::Config(
                "Anthropic model name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            client: Client::from_env(),
            default_config: LLMConfig::new(model).with_max_tokens(DEFAULT_MAX_TOKENS),
        })
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: &[Message],
        config: Option<&LLMConfig>,
    ) -> Result<String, ResearchError> {
        let config = merge_config(&self.default_config, config);
        debug!(model = %config.model, messages = messages.len(), "Anthropic completion");

        let mut agent_builder = self.client.agent(&config.model);

        if let Some(preamble) = extract_system_preamble(messages) {
            agent_builder = agent_builder.preamble(&preamble);
        }
        if let Some(temp) = config.temperature {
            agent_builder = agent_builder.temperature(temp);
        }
        agent_builder = agent_builder.max_tokens(config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));

        let agent = agent_builder.build();
        let prompt = last_user_prompt(messages);

        agent
            .prompt(&prompt)
            .await
            .map_err(|e| ResearchError::Llm(format!("Anthropic completion failed: {}", e)))
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.default_config.model
    }
}
