//! Risk assessment model: six fixed categories plus a headline score.
//!
//! The total score is whatever the scoring model returned. It is not
//! recomputed from the category weights.

use std::fmt;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::lenient;

/// The six scored risk dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Financial,
    Legal,
    Reputational,
    Association,
    Integrity,
    Operational,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Financial,
        RiskCategory::Legal,
        RiskCategory::Reputational,
        RiskCategory::Association,
        RiskCategory::Integrity,
        RiskCategory::Operational,
    ];

    /// JSON key used by the scoring model.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Legal => "legal",
            Self::Reputational => "reputational",
            Self::Association => "association",
            Self::Integrity => "integrity",
            Self::Operational => "operational",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Financial => "Financial",
            Self::Legal => "Legal",
            Self::Reputational => "Reputational",
            Self::Association => "Association",
            Self::Integrity => "Integrity",
            Self::Operational => "Operational",
        }
    }

    /// Advisory weight in percent, given to the model in the prompt.
    pub fn weight(&self) -> u8 {
        match self {
            Self::Financial => 25,
            Self::Legal => 25,
            Self::Reputational => 20,
            Self::Association => 15,
            Self::Integrity => 10,
            Self::Operational => 5,
        }
    }

    /// What the category covers.
    pub fn scope(&self) -> &'static str {
        match self {
            Self::Financial => "Fraud, bankruptcy, financial misconduct, suspicious transactions",
            Self::Legal => "Criminal charges, lawsuits, regulatory violations, investigations",
            Self::Reputational => "Public scandals, media coverage, ethical concerns",
            Self::Association => {
                "Connections to bad actors, criminal organizations, sanctioned entities"
            }
            Self::Integrity => "Dishonesty, misrepresentation, pattern of deception",
            Self::Operational => "Incompetence, negligence, poor judgment",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evidence quality reported for a category score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
            Confidence::Unknown => "Unknown",
        }
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        let text = match value {
            Some(Value::String(s)) => s,
            _ => return Ok(Confidence::Unknown),
        };
        Ok(match text.trim().to_ascii_lowercase().as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Unknown,
        })
    }
}

/// Score and supporting evidence for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRisk {
    /// 0 (no risk) to 100 (extreme risk)
    #[serde(default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub evidence: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<String>,
}

/// The scoring model's full answer.
///
/// Categories the model left out, or returned as anything but an object,
/// stay `None` and are omitted again when the assessment is serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub financial: Option<CategoryRisk>,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub legal: Option<CategoryRisk>,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub reputational: Option<CategoryRisk>,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub association: Option<CategoryRisk>,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub integrity: Option<CategoryRisk>,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub operational: Option<CategoryRisk>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_risk_score: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub overall_assessment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RiskAssessment {
    pub fn category(&self, category: RiskCategory) -> Option<&CategoryRisk> {
        match category {
            RiskCategory::Financial => self.financial.as_ref(),
            RiskCategory::Legal => self.legal.as_ref(),
            RiskCategory::Reputational => self.reputational.as_ref(),
            RiskCategory::Association => self.association.as_ref(),
            RiskCategory::Integrity => self.integrity.as_ref(),
            RiskCategory::Operational => self.operational.as_ref(),
        }
    }

    /// Categories present in the assessment, in fixed order.
    pub fn scored_categories(&self) -> impl Iterator<Item = (RiskCategory, &CategoryRisk)> {
        RiskCategory::ALL
            .into_iter()
            .filter_map(move |c| self.category(c).map(|risk| (c, risk)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "financial": {"score": 80, "confidence": "High", "evidence": ["Charged with wire fraud"], "severity": "Severe"},
        "legal": {"score": 95, "confidence": "High", "evidence": [], "severity": "Criminal conviction"},
        "reputational": {"score": 90, "confidence": "Medium", "evidence": [], "severity": "Lasting"},
        "association": {"score": 30, "confidence": "Low", "evidence": [], "severity": "Limited"},
        "integrity": {"score": 85, "confidence": "High", "evidence": [], "severity": "Pattern"},
        "operational": {"score": 60, "confidence": "Medium", "evidence": [], "severity": "Moderate"},
        "total_risk_score": 77,
        "overall_assessment": "High risk."
    }"#;

    #[test]
    fn test_weights_sum_to_one_hundred() {
        let total: u32 = RiskCategory::ALL.iter().map(|c| c.weight() as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_full_assessment_round_trip() {
        let parsed: RiskAssessment = serde_json::from_str(FULL).unwrap();
        let reparsed: RiskAssessment =
            serde_json::from_str(&serde_json::to_string_pretty(&parsed).unwrap()).unwrap();

        assert_eq!(parsed, reparsed);
        assert_eq!(reparsed.total_risk_score, Some(77.0));
        assert_eq!(reparsed.scored_categories().count(), 6);
        assert_eq!(
            reparsed.category(RiskCategory::Financial).unwrap().evidence,
            vec!["Charged with wire fraud".to_string()]
        );
    }

    #[test]
    fn test_missing_category_is_absent() {
        let parsed: RiskAssessment = serde_json::from_str(
            r#"{"financial": {"score": 10, "confidence": "Low"}, "total_risk_score": 5}"#,
        )
        .unwrap();

        assert!(parsed.category(RiskCategory::Operational).is_none());
        assert_eq!(parsed.scored_categories().count(), 1);

        let json = serde_json::to_value(&parsed).unwrap();
        assert!(json.get("operational").is_none());
    }

    #[test]
    fn test_lenient_scores_and_confidence() {
        let risk: CategoryRisk = serde_json::from_str(
            r#"{"score": "72%", "confidence": "medium", "evidence": "single fact"}"#,
        )
        .unwrap();

        assert_eq!(risk.score, Some(72.0));
        assert_eq!(risk.confidence, Confidence::Medium);
        assert_eq!(risk.evidence, vec!["single fact".to_string()]);

        let odd: CategoryRisk =
            serde_json::from_str(r#"{"score": null, "confidence": "Very High"}"#).unwrap();
        assert!(odd.score.is_none());
        assert_eq!(odd.confidence, Confidence::Unknown);
    }

    #[test]
    fn test_off_schema_values_still_parse() {
        let parsed: RiskAssessment = serde_json::from_str(
            r#"{
                "financial": {"score": 40, "confidence": "High", "evidence": ["Tax lien"], "severity": 3},
                "legal": "No known legal issues",
                "integrity": null,
                "total_risk_score": "40",
                "overall_assessment": ["Moderate", "risk"]
            }"#,
        )
        .unwrap();

        let financial = parsed.category(RiskCategory::Financial).unwrap();
        assert_eq!(financial.severity.as_deref(), Some("3"));
        assert!(parsed.category(RiskCategory::Legal).is_none());
        assert!(parsed.category(RiskCategory::Integrity).is_none());
        assert_eq!(parsed.total_risk_score, Some(40.0));
        assert_eq!(parsed.scored_categories().count(), 1);
        assert!(parsed.overall_assessment.is_some());
    }

    #[test]
    fn test_total_score_is_trusted_as_returned() {
        // Weighted sum of these would be 100, the model says 12.
        let parsed: RiskAssessment = serde_json::from_str(
            r#"{"financial": {"score": 100}, "legal": {"score": 100}, "total_risk_score": 12}"#,
        )
        .unwrap();
        assert_eq!(parsed.total_risk_score, Some(12.0));
    }
}
