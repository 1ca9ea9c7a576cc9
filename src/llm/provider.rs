//! LLM Provider trait definition
//!
//! The narrow seam between the research stages and a hosted model. Each
//! implementation bridges to one vendor through rig-core.

use async_trait::async_trait;

use super::config::LLMConfig;
use super::message::Message;
use crate::error::ResearchError;

/// A stateless request/response text generator.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate one completion for the given conversation.
    ///
    /// `config` overrides the provider defaults field by field; an empty
    /// model name keeps the provider's default model.
    async fn complete(
        &self,
        messages: &[Message],
        config: Option<&LLMConfig>,
    ) -> Result<String, ResearchError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Default model identifier for this provider
    fn default_model(&self) -> &str;
}

/// Overlay runtime settings onto provider defaults.
pub(crate) fn merge_config(defaults: &LLMConfig, runtime: Option<&LLMConfig>) -> LLMConfig {
    match runtime {
        None => defaults.clone(),
        Some(runtime) => LLMConfig {
            model: if runtime.model.is_empty() {
                defaults.model.clone()
            } else {
                runtime.model.clone()
            },
            temperature: runtime.temperature.or(defaults.temperature),
            max_tokens: runtime.max_tokens.or(defaults.max_tokens),
        },
    }
}
