//! diligence-agent: iterative due-diligence research on people and organizations
//!
//! One run loops search → entity extraction → risk scoring until the depth
//! ceiling is reached, then writes a markdown risk report.
//!
//! - `ResearchModels` trait: the three model roles the loop needs
//! - `SearchProvider` trait: query → citation list, never fails
//! - `ResearchWorkflow`: the controller, generic over both
//!
//! ```rust,ignore
//! use diligence_agent::{ModelSet, PerplexitySearch, ResearchRequest, ResearchWorkflow};
//!
//! let workflow = ResearchWorkflow::new(models, PerplexitySearch::new(key));
//! let state = workflow.run(ResearchRequest::new("Acme Holdings")).await;
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod research;
pub mod tools;

// Re-exports for convenience
pub use config::Config;
pub use error::{ResearchError, SearchError};
pub use llm::{LLMConfig, LLMProvider, Message, ModelSet, ResearchModels, Role};
pub use research::{
    ResearchRequest, ResearchState, ResearchSummary, ResearchWorkflow, StageOutput,
    WorkflowSettings,
};
pub use tools::{PerplexitySearch, SearchProvider, SearchResult};
