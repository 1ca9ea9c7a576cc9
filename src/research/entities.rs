//! Structured entities pulled out of the findings text.
//!
//! Every category is optional on the wire and every record field may be
//! missing or of the wrong JSON type; extraction models are not reliable
//! about either. Scalars are kept as text and non-object records skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalRecord {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// Result of one entity extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityReport {
    #[serde(default, deserialize_with = "lenient::records")]
    pub people: Vec<Person>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub organizations: Vec<Organization>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub locations: Vec<Location>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub financial: Vec<FinancialRecord>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub legal: Vec<LegalRecord>,
    /// Keys the model added beyond the six categories
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Headline counts shown in summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub people: usize,
    pub organizations: usize,
    pub events: usize,
}

impl EntityReport {
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            people: self.people.len(),
            organizations: self.organizations.len(),
            events: self.timeline.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_categories_default_to_empty() {
        let report: EntityReport =
            serde_json::from_str(r#"{"people": [{"name": "Jane Doe", "role": "CEO"}]}"#).unwrap();

        assert_eq!(report.people.len(), 1);
        assert_eq!(report.people[0].name.as_deref(), Some("Jane Doe"));
        assert!(report.people[0].relationship.is_none());
        assert!(report.organizations.is_empty());
        assert!(report.legal.is_empty());
        assert_eq!(
            report.counts(),
            EntityCounts {
                people: 1,
                organizations: 0,
                events: 0
            }
        );
    }

    #[test]
    fn test_type_fields_and_null_values() {
        let report: EntityReport = serde_json::from_str(
            r#"{
                "organizations": [{"name": "Acme", "type": "company", "relationship": null}],
                "legal": [{"type": "lawsuit", "description": "Fraud claim", "date": "2019"}],
                "timeline": [{"date": "2015", "event": "Founded Acme"}]
            }"#,
        )
        .unwrap();

        assert_eq!(report.organizations[0].kind.as_deref(), Some("company"));
        assert!(report.organizations[0].relationship.is_none());
        assert_eq!(report.legal[0].kind.as_deref(), Some("lawsuit"));
        assert!(report.legal[0].outcome.is_none());
        assert_eq!(report.counts().events, 1);
    }

    #[test]
    fn test_off_schema_values_still_count() {
        let report: EntityReport = serde_json::from_str(
            r#"{
                "people": [{"name": "Jane Doe"}, "John Roe"],
                "timeline": [{"date": 2019, "event": "Founded Acme"}],
                "financial": [{"amount": 5000000, "date": null}],
                "legal": "none found"
            }"#,
        )
        .unwrap();

        assert_eq!(report.people.len(), 1);
        assert_eq!(report.timeline[0].date.as_deref(), Some("2019"));
        assert_eq!(report.financial[0].amount.as_deref(), Some("5000000"));
        assert!(report.financial[0].date.is_none());
        assert!(report.legal.is_empty());
        assert_eq!(report.counts().events, 1);
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let report: EntityReport =
            serde_json::from_str(r#"{"people": [], "aliases": ["J. Doe"]}"#).unwrap();

        assert_eq!(report.extra["aliases"], serde_json::json!(["J. Doe"]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aliases"], serde_json::json!(["J. Doe"]));
    }
}
