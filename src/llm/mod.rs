//! Language-model clients
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Research stages                  │
//! └─────────────────┬───────────────────────┘
//!                   │ ResearchModels (trait)
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │   ModelSet                              │
//! │   queries │ extraction │ analysis       │
//! └─────────────────┬───────────────────────┘
//!                   │ LLMProvider (trait)
//!          ┌────────┼────────┐
//!          ▼        ▼        ▼
//!       OpenAI   Gemini   Anthropic   (rig-core)
//! ```

mod anthropic;
mod config;
mod gemini;
mod message;
mod models;
mod openai;
mod provider;

pub use anthropic::AnthropicProvider;
pub use config::LLMConfig;
pub use gemini::GeminiProvider;
pub use message::{extract_system_preamble, last_user_prompt, Message, Role};
pub use models::{ModelSet, ResearchModels};
pub use openai::OpenAIProvider;
pub use provider::LLMProvider;
