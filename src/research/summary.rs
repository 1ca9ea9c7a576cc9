//! Console summary of a finished run.

use std::fmt;

use serde::Serialize;

use super::entities::EntityCounts;
use super::risk::RiskCategory;
use super::state::ResearchState;

/// Score line for one category the risk model actually returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: RiskCategory,
    pub score: Option<f64>,
}

/// Headline numbers pulled from a [`ResearchState`].
///
/// Anything the models did not return, or returned as unparseable text, is
/// simply left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchSummary {
    pub target: String,
    pub iterations: usize,
    pub sources: usize,
    pub total_risk_score: Option<f64>,
    pub categories: Vec<CategoryScore>,
    pub entities: Option<EntityCounts>,
}

impl ResearchSummary {
    pub fn from_state(state: &ResearchState) -> Self {
        let assessment = state.risk_analysis.structured();

        let categories = assessment
            .map(|risk| {
                risk.scored_categories()
                    .map(|(category, detail)| CategoryScore {
                        category,
                        score: detail.score,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            target: state.target.clone(),
            iterations: state.depth,
            sources: state.num_sources,
            total_risk_score: assessment.and_then(|risk| risk.total_risk_score),
            categories,
            entities: state.entities.structured().map(|report| report.counts()),
        }
    }
}

fn score_text(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{value}"),
        None => "N/A".to_string(),
    }
}

impl fmt::Display for ResearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "RESEARCH SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;
        writeln!(f, "Target: {}", self.target)?;
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Sources: {}", self.sources)?;

        writeln!(f)?;
        writeln!(f, "Overall Risk Score: {}/100", score_text(self.total_risk_score))?;
        if !self.categories.is_empty() {
            writeln!(f, "Risk Breakdown:")?;
            for entry in &self.categories {
                writeln!(f, "  {}: {}/100", entry.category.label(), score_text(entry.score))?;
            }
        }

        if let Some(counts) = &self.entities {
            writeln!(f)?;
            writeln!(
                f,
                "Entities: {} people, {} orgs, {} events",
                counts.people, counts.organizations, counts.events
            )?;
        }

        write!(f, "{rule}")
    }
}
