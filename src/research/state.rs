//! Research state threaded through every stage of the loop.
//!
//! `all_findings` is cumulative across iterations, while `entities` and
//! `risk_analysis` only ever hold the latest iteration's result.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::entities::EntityReport;
use super::risk::RiskAssessment;

/// Default number of search/extract/risk iterations
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// What the caller asks to research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub target: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub time_period: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl ResearchRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            context: String::new(),
            focus: String::new(),
            time_period: String::new(),
            industry: String::new(),
            location: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = focus.into();
        self
    }

    pub fn with_time_period(mut self, time_period: impl Into<String>) -> Self {
        self.time_period = time_period.into();
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A JSON object returned by a model, together with a typed view of it.
///
/// The object is kept exactly as parsed so that later prompts and the
/// serialized state see every key and value the model produced, including
/// ones the typed view ignores or normalizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    json: Value,
    typed: T,
}

impl<T> Parsed<T> {
    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn typed(&self) -> &T {
        &self.typed
    }
}

impl<T: DeserializeOwned + Default> Parsed<T> {
    pub fn from_json(json: Value) -> Self {
        let typed = match serde_json::from_value(json.clone()) {
            Ok(typed) => typed,
            Err(e) => {
                warn!(error = %e, "Typed view unavailable; keeping the JSON only");
                T::default()
            }
        };
        Self { json, typed }
    }
}

impl<T> Serialize for Parsed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for Parsed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Parsed::from_json)
    }
}

/// Outcome of a stage that asks a model for structured JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    content = "value",
    rename_all = "snake_case",
    bound(serialize = "", deserialize = "T: DeserializeOwned + Default")
)]
pub enum StageOutput<T> {
    /// The stage has not run yet.
    #[default]
    Pending,
    /// The response was a JSON object.
    Structured(Parsed<T>),
    /// The response was not a JSON object; kept verbatim.
    Raw(String),
    /// No response at all.
    Failed(String),
}

impl<T> StageOutput<T> {
    pub fn structured(&self) -> Option<&T> {
        match self {
            StageOutput::Structured(parsed) => Some(parsed.typed()),
            _ => None,
        }
    }

    /// The object exactly as the model returned it.
    pub fn structured_json(&self) -> Option<&Value> {
        match self {
            StageOutput::Structured(parsed) => Some(parsed.json()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StageOutput::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutput::Failed(_))
    }

    /// Text form embedded into later prompts and shown to readers.
    pub fn prompt_text(&self) -> String {
        match self {
            StageOutput::Pending => "N/A".to_string(),
            StageOutput::Structured(parsed) => {
                serde_json::to_string_pretty(parsed.json()).unwrap_or_default()
            }
            StageOutput::Raw(text) => text.clone(),
            StageOutput::Failed(reason) => serde_json::json!({ "error": reason }).to_string(),
        }
    }
}

impl<T: DeserializeOwned + Default> StageOutput<T> {
    /// Parse a model response. Any JSON object is structured; everything
    /// else is kept as the original text.
    pub fn decode(response: &str) -> Self {
        match serde_json::from_str::<Value>(clean_json_response(response)) {
            Ok(value @ Value::Object(_)) => StageOutput::Structured(Parsed::from_json(value)),
            _ => StageOutput::Raw(response.to_string()),
        }
    }
}

/// Strip Markdown code fences that models like to wrap JSON in.
pub fn clean_json_response(response: &str) -> &str {
    let mut text = response.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// The single mutable aggregate of one research run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    pub target: String,
    pub context: String,
    pub focus: String,
    pub time_period: String,
    pub industry: String,
    pub location: String,

    /// Completed search iterations; bumped at the start of each search stage
    pub depth: usize,
    pub max_depth: usize,

    /// Append-only log of formatted search output
    pub all_findings: String,

    /// Results returned by the search provider, placeholders included
    pub num_sources: usize,

    /// Latest extraction only
    pub entities: StageOutput<EntityReport>,

    /// Latest assessment only
    pub risk_analysis: StageOutput<RiskAssessment>,

    /// Set once by the report stage
    pub final_report: String,
}

impl ResearchState {
    pub fn new(request: ResearchRequest) -> Self {
        Self {
            target: request.target,
            context: request.context,
            focus: request.focus,
            time_period: request.time_period,
            industry: request.industry,
            location: request.location,
            depth: 0,
            max_depth: request.max_depth,
            all_findings: String::new(),
            num_sources: 0,
            entities: StageOutput::Pending,
            risk_analysis: StageOutput::Pending,
            final_report: String::new(),
        }
    }

    pub fn append_findings(&mut self, block: &str) {
        self.all_findings.push_str("\n\n");
        self.all_findings.push_str(block);
    }

    pub fn has_report(&self) -> bool {
        !self.final_report.is_empty()
    }
}
