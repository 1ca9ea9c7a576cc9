//! Research controller
//!
//! A small explicit state machine drives one [`ResearchState`] through the
//! loop:
//!
//! ```text
//!            ┌──────────────────────────────────────┐
//!            ▼                                      │ depth < max_depth
//!      ┌──────────┐    ┌──────────┐    ┌──────────┐ │
//! ───▶ │  Search  │ ─▶ │ Extract  │ ─▶ │   Risk   │ ┤
//!      └──────────┘    └──────────┘    └──────────┘ │ otherwise
//!                                                   ▼
//!                                             ┌──────────┐
//!                                             │  Report  │ ─▶ Done
//!                                             └──────────┘
//! ```
//!
//! Stages run strictly one after another. Failures of external services are
//! absorbed inside each stage; controller failures abort the run and
//! [`ResearchWorkflow::run`] hands back the untouched initial state.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::entities::EntityReport;
use super::prompts::{fallback_queries, parse_query_list, DiligencePrompts};
use super::risk::RiskAssessment;
use super::state::{ResearchRequest, ResearchState, StageOutput};
use crate::error::ResearchError;
use crate::llm::{LLMConfig, ResearchModels};
use crate::tools::{batch_search, format_search_results, SearchProvider};

/// Stored as the report when the report model gives nothing back
pub const REPORT_FAILED: &str = "Report generation failed";

/// Stored as the entities failure reason when extraction gives nothing back
pub const EXTRACTION_FAILED: &str = "Extraction failed";

/// Stored as the risk failure reason when analysis gives nothing back
pub const ANALYSIS_FAILED: &str = "Analysis failed";

/// Position of the controller in the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Extract,
    Risk,
    Report,
    Done,
}

/// Decision taken after the risk stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Continue,
    Report,
}

/// Loop again while the post-increment depth is below the ceiling.
pub fn should_continue(state: &ResearchState) -> Branch {
    if state.depth < state.max_depth {
        Branch::Continue
    } else {
        Branch::Report
    }
}

/// Transition function of the controller.
pub fn next_stage(stage: Stage, state: &ResearchState) -> Stage {
    match stage {
        Stage::Search => Stage::Extract,
        Stage::Extract => Stage::Risk,
        Stage::Risk => match should_continue(state) {
            Branch::Continue => Stage::Search,
            Branch::Report => Stage::Report,
        },
        Stage::Report | Stage::Done => Stage::Done,
    }
}

/// Tunables of the research loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    /// Generated queries beyond this are dropped
    pub max_queries_per_search: usize,

    /// Passed to the search provider for every query
    pub max_results_per_query: usize,

    /// Hard ceiling on executed stages; a safety net, not normal control
    pub iteration_cap: usize,

    pub query_model: LLMConfig,
    pub extraction_model: LLMConfig,
    pub risk_model: LLMConfig,
    pub report_model: LLMConfig,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_queries_per_search: 8,
            max_results_per_query: 3,
            iteration_cap: 100,
            query_model: LLMConfig::default()
                .with_temperature(0.7)
                .with_max_tokens(1000),
            extraction_model: LLMConfig::default()
                .with_temperature(0.3)
                .with_max_tokens(2000),
            risk_model: LLMConfig::default()
                .with_temperature(0.3)
                .with_max_tokens(3000),
            report_model: LLMConfig::default()
                .with_temperature(0.6)
                .with_max_tokens(8000),
        }
    }
}

impl WorkflowSettings {
    pub fn with_max_queries_per_search(mut self, max: usize) -> Self {
        self.max_queries_per_search = max;
        self
    }

    pub fn with_max_results_per_query(mut self, max: usize) -> Self {
        self.max_results_per_query = max;
        self
    }

    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = cap;
        self
    }
}

/// The research loop, wired to its model and search capabilities.
pub struct ResearchWorkflow<M, S> {
    models: M,
    search: S,
    settings: WorkflowSettings,
}

impl<M, S> ResearchWorkflow<M, S>
where
    M: ResearchModels,
    S: SearchProvider,
{
    pub fn new(models: M, search: S) -> Self {
        Self::with_settings(models, search, WorkflowSettings::default())
    }

    pub fn with_settings(models: M, search: S, settings: WorkflowSettings) -> Self {
        Self {
            models,
            search,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub fn models(&self) -> &M {
        &self.models
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    /// Run a full investigation.
    ///
    /// Never fails: if the controller errors or panics anywhere, the initial
    /// state built from `request` is returned as-is.
    pub async fn run(&self, request: ResearchRequest) -> ResearchState {
        let initial = ResearchState::new(request);
        info!(
            subject = %initial.target,
            max_depth = initial.max_depth,
            search = self.search.name(),
            "Starting due-diligence research"
        );

        let outcome = AssertUnwindSafe(self.execute(initial.clone()))
            .catch_unwind()
            .await;

        let failure = match outcome {
            Ok(Ok(state)) => {
                info!(
                    depth = state.depth,
                    sources = state.num_sources,
                    report_chars = state.final_report.len(),
                    "Research complete"
                );
                return state;
            }
            Ok(Err(e)) => e,
            Err(payload) => ResearchError::Panicked(panic_message(payload.as_ref())),
        };

        error!(error = %failure, "Research aborted, returning initial state");
        initial
    }

    /// Drive the state machine from `Search` to `Done`.
    pub async fn execute(&self, mut state: ResearchState) -> Result<ResearchState, ResearchError> {
        let mut stage = Stage::Search;
        let mut executed = 0usize;

        while stage != Stage::Done {
            executed += 1;
            if executed > self.settings.iteration_cap {
                return Err(ResearchError::IterationLimit {
                    limit: self.settings.iteration_cap,
                });
            }

            state = match stage {
                Stage::Search => {
                    let state = self.search_stage(state).await;
                    check_depth(&state)?;
                    state
                }
                Stage::Extract => self.extract_stage(state).await,
                Stage::Risk => self.risk_stage(state).await,
                Stage::Report => self.report_stage(state).await,
                Stage::Done => state,
            };

            let next = next_stage(stage, &state);
            if stage == Stage::Risk {
                match next {
                    Stage::Search => info!(next_depth = state.depth + 1, "Continuing research"),
                    _ => info!("Proceeding to final report"),
                }
            }
            stage = next;
        }

        Ok(state)
    }

    /// Generate queries, run them, and append the formatted results.
    pub async fn search_stage(&self, mut state: ResearchState) -> ResearchState {
        state.depth += 1;
        info!(depth = state.depth, max_depth = state.max_depth, "SEARCH");

        let messages = DiligencePrompts::query_generation(&state);
        let response = self
            .models
            .generate_queries(&messages, &self.settings.query_model)
            .await;

        let mut queries = match response.as_deref().and_then(parse_query_list) {
            Some(queries) => {
                info!(count = queries.len(), "Generated queries");
                queries
            }
            None => {
                warn!("Query generation unusable, using fallback queries");
                fallback_queries(&state.target)
            }
        };
        queries.truncate(self.settings.max_queries_per_search);

        let batch = batch_search(&self.search, &queries, self.settings.max_results_per_query).await;

        let mut lines = Vec::with_capacity(batch.len() * 2);
        let mut returned = 0;
        for entry in &batch {
            lines.push(format!("\n[Query: {}]", entry.query));
            lines.push(format_search_results(&entry.results));
            returned += entry.results.len();
        }

        state.append_findings(&lines.join("\n"));
        state.num_sources += returned;
        info!(new = returned, total = state.num_sources, "Total sources");

        state
    }

    /// Replace `entities` with a fresh extraction over the latest findings.
    pub async fn extract_stage(&self, mut state: ResearchState) -> ResearchState {
        info!(depth = state.depth, "EXTRACT - entity & timeline extraction");

        let prompt = DiligencePrompts::entity_extraction(&state);
        let response = self
            .models
            .extract_entities(&prompt, &self.settings.extraction_model)
            .await;

        state.entities = match response {
            None => {
                warn!("Entity extraction returned no response");
                StageOutput::Failed(EXTRACTION_FAILED.to_string())
            }
            Some(text) => {
                let output = StageOutput::<EntityReport>::decode(&text);
                match output.structured() {
                    Some(report) => {
                        let counts = report.counts();
                        info!(
                            people = counts.people,
                            organizations = counts.organizations,
                            events = counts.events,
                            "Extracted entities"
                        );
                    }
                    None => warn!("Extraction response was not a JSON object, keeping raw text"),
                }
                output
            }
        };

        state
    }

    /// Replace `risk_analysis` with a fresh assessment.
    pub async fn risk_stage(&self, mut state: ResearchState) -> ResearchState {
        info!(depth = state.depth, "RISK - multi-category analysis");

        let (system, user) = DiligencePrompts::risk_analysis(&state);
        let response = self
            .models
            .assess(&system, &user, &self.settings.risk_model)
            .await;

        state.risk_analysis = match response {
            None => {
                warn!("Risk analysis returned no response");
                StageOutput::Failed(ANALYSIS_FAILED.to_string())
            }
            Some(text) => {
                let output = StageOutput::<RiskAssessment>::decode(&text);
                match output.structured() {
                    Some(assessment) => match assessment.total_risk_score {
                        Some(score) => info!(total_risk_score = score, "Risk analysis complete"),
                        None => warn!("Risk analysis has no total_risk_score"),
                    },
                    None => warn!("Risk response was not a JSON object, keeping raw text"),
                }
                output
            }
        };

        state
    }

    /// Write the final report. Runs once, after the loop.
    pub async fn report_stage(&self, mut state: ResearchState) -> ResearchState {
        info!(depth = state.depth, sources = state.num_sources, "REPORT - synthesizing final report");

        let (system, user) = DiligencePrompts::report(&state);
        debug!(prompt_chars = user.len(), "Report prompt prepared");

        state.final_report = match self
            .models
            .assess(&system, &user, &self.settings.report_model)
            .await
        {
            Some(report) => report,
            None => {
                warn!("Report generation returned no response");
                REPORT_FAILED.to_string()
            }
        };
        info!(chars = state.final_report.len(), "Report generated");

        state
    }
}

fn check_depth(state: &ResearchState) -> Result<(), ResearchError> {
    if state.depth > state.max_depth + 1 {
        return Err(ResearchError::InvariantViolation(format!(
            "depth {} exceeds max depth {} + 1",
            state.depth, state.max_depth
        )));
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
