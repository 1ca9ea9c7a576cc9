//! Field deserializers that accept whatever shape a model produced.
//!
//! None of these fail on a well-formed JSON value; a value of the wrong
//! shape becomes absent or empty instead.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Any scalar as text; arrays and objects as their JSON text.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A JSON number or a numeric string such as `"85"` or `"85%"`.
pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

/// An array of strings or a single string.
pub(crate) fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    })
}

/// An array of records. Items that are not objects are skipped, anything
/// other than an array is empty.
pub(crate) fn records<'de, D, R>(deserializer: D) -> Result<Vec<R>, D::Error>
where
    D: Deserializer<'de>,
    R: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A single record; absent unless the value is an object.
pub(crate) fn record<'de, D, R>(deserializer: D) -> Result<Option<R>, D::Error>
where
    D: Deserializer<'de>,
    R: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(item @ Value::Object(_)) => serde_json::from_value(item).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "number")]
        number: Option<f64>,
        #[serde(default, deserialize_with = "strings")]
        strings: Vec<String>,
        #[serde(default, deserialize_with = "records")]
        records: Vec<Inner>,
        #[serde(default, deserialize_with = "record")]
        record: Option<Inner>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Inner {
        #[serde(default, deserialize_with = "text")]
        name: Option<String>,
    }

    fn parse(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_accepts_scalars() {
        assert_eq!(parse(r#"{"text": 2019}"#).text.as_deref(), Some("2019"));
        assert_eq!(parse(r#"{"text": true}"#).text.as_deref(), Some("true"));
        assert_eq!(parse(r#"{"text": ["a"]}"#).text.as_deref(), Some(r#"["a"]"#));
        assert!(parse(r#"{"text": null}"#).text.is_none());
        assert!(parse("{}").text.is_none());
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(parse(r#"{"number": "72%"}"#).number, Some(72.0));
        assert_eq!(parse(r#"{"number": 40}"#).number, Some(40.0));
        assert!(parse(r#"{"number": "high"}"#).number.is_none());
    }

    #[test]
    fn test_strings_accept_single_value() {
        assert_eq!(parse(r#"{"strings": "one"}"#).strings, vec!["one"]);
        assert_eq!(parse(r#"{"strings": ["a", 3, null]}"#).strings, vec!["a", "3"]);
        assert!(parse(r#"{"strings": {"a": 1}}"#).strings.is_empty());
    }

    #[test]
    fn test_records_skip_non_objects() {
        let sample = parse(r#"{"records": [{"name": "A"}, "B", 7, {"name": 3}]}"#);
        assert_eq!(sample.records.len(), 2);
        assert_eq!(sample.records[1].name.as_deref(), Some("3"));

        assert!(parse(r#"{"records": "none"}"#).records.is_empty());
    }

    #[test]
    fn test_record_requires_object() {
        assert!(parse(r#"{"record": "High risk"}"#).record.is_none());
        assert!(parse(r#"{"record": 40}"#).record.is_none());
        assert_eq!(
            parse(r#"{"record": {"name": "A"}}"#).record,
            Some(Inner {
                name: Some("A".to_string())
            })
        );
    }
}
