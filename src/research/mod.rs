//! Due-diligence research loop
//!
//! Iteratively investigates one target (a person or an organization) and
//! ends with a risk-focused markdown report.
//!
//! # Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Due-Diligence Workflow                      │
//! │                                                              │
//! │  Search   generate queries, run them, append findings        │
//! │     ▼                                                        │
//! │  Extract  people, organizations, timeline, money, legal      │
//! │     ▼                                                        │
//! │  Risk     six weighted categories + total score              │
//! │     ▼                                                        │
//! │  depth < max_depth ? ── yes ──▶ Search                       │
//! │     │ no                                                     │
//! │     ▼                                                        │
//! │  Report   long-form markdown synthesis                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use diligence_agent::llm::ModelSet;
//! use diligence_agent::research::{ResearchRequest, ResearchWorkflow};
//! use diligence_agent::tools::PerplexitySearch;
//!
//! let models = ModelSet::from_env("gpt-4.1", "gemini-2.0-flash", "claude-sonnet-4-20250514")?;
//! let search = PerplexitySearch::new(api_key);
//! let workflow = ResearchWorkflow::new(models, search);
//!
//! let state = workflow
//!     .run(ResearchRequest::new("Jane Doe").with_context("Fintech founder"))
//!     .await;
//! println!("{}", state.final_report);
//! ```
//!
//! # Module Structure
//!
//! - `state` - request, research state and per-stage outcomes
//! - `entities` / `risk` - typed shapes of the model answers
//! - `lenient` - field deserializers tolerant of off-schema values
//! - `prompts` - prompt templates for each stage
//! - `workflow` - the controller and its stages
//! - `summary` - console summary of a finished run

pub mod entities;
mod lenient;
pub mod prompts;
pub mod risk;
pub mod state;
pub mod summary;
pub mod workflow;

// Re-exports for convenience
pub use entities::{
    EntityCounts, EntityReport, FinancialRecord, LegalRecord, Location, Organization, Person,
    TimelineEvent,
};
pub use prompts::{fallback_queries, parse_query_list, DiligencePrompts};
pub use risk::{CategoryRisk, Confidence, RiskAssessment, RiskCategory};
pub use state::{
    clean_json_response, Parsed, ResearchRequest, ResearchState, StageOutput, DEFAULT_MAX_DEPTH,
};
pub use summary::{CategoryScore, ResearchSummary};
pub use workflow::{
    next_stage, should_continue, Branch, ResearchWorkflow, Stage, WorkflowSettings,
    ANALYSIS_FAILED, EXTRACTION_FAILED, REPORT_FAILED,
};
