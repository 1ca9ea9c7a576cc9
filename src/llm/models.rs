//! The model capability bundle handed to the research workflow.
//!
//! The workflow never talks to a vendor client directly. It receives a
//! [`ResearchModels`] implementation with one method per role, so tests can
//! substitute scripted fakes and no client lives in process-wide state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use super::anthropic::AnthropicProvider;
use super::config::LLMConfig;
use super::gemini::GeminiProvider;
use super::message::Message;
use super::openai::OpenAIProvider;
use super::provider::LLMProvider;
use crate::error::ResearchError;

/// Three generation capabilities used by the research stages.
///
/// Every method returns `None` on any transport or provider failure and
/// never errors outward.
#[async_trait]
pub trait ResearchModels: Send + Sync {
    /// Query generation from a chat conversation.
    async fn generate_queries(&self, messages: &[Message], config: &LLMConfig) -> Option<String>;

    /// Entity extraction from a single prompt.
    async fn extract_entities(&self, prompt: &str, config: &LLMConfig) -> Option<String>;

    /// Risk scoring and report writing from a system and a user prompt.
    async fn assess(&self, system_prompt: &str, user_prompt: &str, config: &LLMConfig)
        -> Option<String>;
}

/// [`ResearchModels`] backed by three [`LLMProvider`]s.
#[derive(Clone)]
pub struct ModelSet {
    query_model: Arc<dyn LLMProvider>,
    extraction_model: Arc<dyn LLMProvider>,
    analysis_model: Arc<dyn LLMProvider>,
}

impl ModelSet {
    pub fn new(
        query_model: Arc<dyn LLMProvider>,
        extraction_model: Arc<dyn LLMProvider>,
        analysis_model: Arc<dyn LLMProvider>,
    ) -> Self {
        Self {
            query_model,
            extraction_model,
            analysis_model,
        }
    }

    /// OpenAI for queries, Gemini for extraction, Anthropic for analysis.
    pub fn from_env(
        query_model: &str,
        extraction_model: &str,
        analysis_model: &str,
    ) -> Result<Self, ResearchError> {
        Ok(Self::new(
            Arc::new(OpenAIProvider::from_env_with_model(query_model)?),
            Arc::new(GeminiProvider::from_env_with_model(extraction_model)?),
            Arc::new(AnthropicProvider::from_env_with_model(analysis_model)?),
        ))
    }

    async fn call(
        provider: &dyn LLMProvider,
        messages: &[Message],
        config: &LLMConfig,
    ) -> Option<String> {
        match provider.complete(messages, Some(config)).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(provider = provider.name(), "Model returned empty content");
                None
            }
            Ok(text) => Some(text),
            Err(e) if e.is_recoverable() => {
                warn!(provider = provider.name(), error = %e, "Model call failed");
                None
            }
            Err(e) => {
                error!(provider = provider.name(), error = %e, "Model client unusable");
                None
            }
        }
    }
}

#[async_trait]
impl ResearchModels for ModelSet {
    async fn generate_queries(&self, messages: &[Message], config: &LLMConfig) -> Option<String> {
        Self::call(self.query_model.as_ref(), messages, config).await
    }

    async fn extract_entities(&self, prompt: &str, config: &LLMConfig) -> Option<String> {
        let messages = [Message::user(prompt)];
        Self::call(self.extraction_model.as_ref(), &messages, config).await
    }

    async fn assess(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &LLMConfig,
    ) -> Option<String> {
        let messages = [Message::system(system_prompt), Message::user(user_prompt)];
        Self::call(self.analysis_model.as_ref(), &messages, config).await
    }
}
