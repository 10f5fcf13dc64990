//! Extraction of the forecast series and the optional consequences list from
//! a loosely shaped response body.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ConsequenceEntry, DEFAULT_CONSEQUENCE_ICON};
use crate::forecast::ForecastError;

/// The four series every forecast response must carry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPayload {
    pub dates: Vec<String>,
    pub predictions: Vec<f64>,
    pub last_16_dates: Vec<String>,
    pub last_16_values: Vec<f64>,
}

/// Reads `data.{dates,predictions,last_16_dates,last_16_values}` from a full
/// response body.
pub fn extract_payload(body: &Value) -> Result<ForecastPayload, ForecastError> {
    let data = body
        .get("data")
        .ok_or_else(|| ForecastError::IncompletePayload("missing `data` object".to_string()))?;
    extract_series(data)
}

/// Validates a bare `data` object, as shipped in the fallback snapshot.
pub fn extract_series(data: &Value) -> Result<ForecastPayload, ForecastError> {
    if !data.is_object() {
        return Err(ForecastError::IncompletePayload(
            "`data` is not an object".to_string(),
        ));
    }
    ForecastPayload::deserialize(data).map_err(|err| ForecastError::IncompletePayload(err.to_string()))
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    TopLevel,
    Data,
}

/// Where a consequences list may live, in the order they are tried.
const CONSEQUENCE_SOURCES: &[(Scope, &str)] = &[
    (Scope::TopLevel, "consequences"),
    (Scope::Data, "consequences"),
    (Scope::TopLevel, "impacts"),
    (Scope::Data, "impacts"),
];

const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "text"];
const IMPACT_LEVEL_KEYS: &[&str] = &["impact_level", "impactLevel", "level"];
const ICON_KEYS: &[&str] = &["icon", "iconName", "icon_class"];

/// Finds the consequences list anywhere it is known to appear and normalizes
/// each entry. Absence is not an error.
pub fn extract_consequences(body: &Value) -> Vec<ConsequenceEntry> {
    CONSEQUENCE_SOURCES
        .iter()
        .filter_map(|(scope, key)| {
            let container = match scope {
                Scope::TopLevel => Some(body),
                Scope::Data => get_ignore_case(body, "data"),
            }?;
            get_ignore_case(container, key)?.as_array()
        })
        .next()
        .map(|entries| normalize_consequences(entries))
        .unwrap_or_default()
}

pub fn normalize_consequences(entries: &[Value]) -> Vec<ConsequenceEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(normalize_consequence)
        .collect()
}

fn normalize_consequence(entry: &Value) -> ConsequenceEntry {
    let description = first_non_empty_text(entry, DESCRIPTION_KEYS).unwrap_or_default();

    let impact_level = IMPACT_LEVEL_KEYS
        .iter()
        .filter_map(|key| entry.get(key))
        .find(|value| !value.is_null())
        .map_or(0, coerce_level);

    let icon = first_non_empty_text(entry, ICON_KEYS)
        .unwrap_or_else(|| DEFAULT_CONSEQUENCE_ICON.to_string());

    ConsequenceEntry {
        description,
        impact_level,
        icon,
    }
}

/// Case-insensitive object key lookup.
fn get_ignore_case<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let object = value.as_object()?;
    object
        .get(key)
        .or_else(|| {
            object
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
                .map(|(_, found)| found)
        })
}

fn first_non_empty_text(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| entry.get(key)).find_map(|value| match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Numeric coercion for impact levels; anything non-numeric becomes 0.
#[allow(clippy::cast_possible_truncation)]
fn coerce_level(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(0)
        }
        Value::Bool(flag) => i64::from(*flag),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_body() -> Value {
        json!({
            "data": {
                "dates": ["2024-01"],
                "predictions": [420.1],
                "last_16_dates": ["2023-12"],
                "last_16_values": [419.8]
            }
        })
    }

    #[test]
    fn extracts_the_four_series() {
        let payload = extract_payload(&minimal_body()).unwrap();
        assert_eq!(payload.dates, vec!["2024-01"]);
        assert_eq!(payload.predictions, vec![420.1]);
        assert_eq!(payload.last_16_dates, vec!["2023-12"]);
        assert_eq!(payload.last_16_values, vec![419.8]);
    }

    #[test]
    fn each_missing_series_is_an_incomplete_payload() {
        for field in ["dates", "predictions", "last_16_dates", "last_16_values"] {
            let mut body = minimal_body();
            body["data"].as_object_mut().unwrap().remove(field);
            let err = extract_payload(&body).unwrap_err();
            assert!(
                matches!(err, ForecastError::IncompletePayload(_)),
                "{field}: {err:?}"
            );
        }
    }

    #[test]
    fn missing_data_or_wrong_types_are_incomplete() {
        assert!(matches!(
            extract_payload(&json!({"dates": []})),
            Err(ForecastError::IncompletePayload(_))
        ));
        assert!(matches!(
            extract_payload(&json!({"data": [1, 2]})),
            Err(ForecastError::IncompletePayload(_))
        ));

        let mut body = minimal_body();
        body["data"]["predictions"] = json!(["not a number"]);
        assert!(matches!(
            extract_payload(&body),
            Err(ForecastError::IncompletePayload(_))
        ));
    }

    #[test]
    fn null_values_inside_a_series_are_incomplete() {
        for field in ["predictions", "last_16_values"] {
            let mut body = minimal_body();
            body["data"][field] = json!([421.0, null]);
            assert!(
                matches!(extract_payload(&body), Err(ForecastError::IncompletePayload(_))),
                "{field}"
            );
        }
    }

    #[test]
    fn empty_series_are_still_complete() {
        let body = json!({
            "data": {"dates": [], "predictions": [], "last_16_dates": [], "last_16_values": []}
        });
        let payload = extract_payload(&body).unwrap();
        assert!(payload.dates.is_empty());
    }

    #[test]
    fn no_consequences_anywhere_yields_empty() {
        assert!(extract_consequences(&minimal_body()).is_empty());
        assert!(extract_consequences(&json!("just a string")).is_empty());
    }

    #[test]
    fn capitalized_top_level_key_matches_like_lowercase() {
        let entries = json!([{"description": "Ocean acidification", "impact_level": 4, "icon": "droplet"}]);

        let mut lower = minimal_body();
        lower["consequences"] = entries.clone();
        let mut upper = minimal_body();
        upper["Consequences"] = entries;

        let found = extract_consequences(&upper);
        assert_eq!(found, extract_consequences(&lower));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Ocean acidification");
    }

    #[test]
    fn nested_impacts_are_found_when_nothing_else_matches() {
        let mut body = minimal_body();
        body["data"]["IMPACTS"] = json!([{"text": "Glacier melt", "level": "4", "iconName": "snowflake"}]);

        let found = extract_consequences(&body);
        assert_eq!(
            found,
            vec![ConsequenceEntry {
                description: "Glacier melt".into(),
                impact_level: 4,
                icon: "snowflake".into(),
            }]
        );
    }

    #[test]
    fn first_array_valued_candidate_wins() {
        let mut body = minimal_body();
        body["consequences"] = json!("not a list");
        body["data"]["consequences"] = json!([{"desc": "from data"}]);
        body["impacts"] = json!([{"desc": "from impacts"}]);

        let found = extract_consequences(&body);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "from data");
    }

    #[test]
    fn aliases_and_defaults() {
        let entries = json!([
            {"desc": "Short alias", "impactLevel": 3, "icon_class": "fire"},
            {"text": "", "desc": "Empty description skipped", "level": null, "impact_level": null},
            {}
        ]);
        let normalized = normalize_consequences(entries.as_array().unwrap());

        assert_eq!(normalized[0].description, "Short alias");
        assert_eq!(normalized[0].impact_level, 3);
        assert_eq!(normalized[0].icon, "fire");

        assert_eq!(normalized[1].description, "Empty description skipped");
        assert_eq!(normalized[1].impact_level, 0);

        assert_eq!(
            normalized[2],
            ConsequenceEntry {
                description: String::new(),
                impact_level: 0,
                icon: "leaf".into(),
            }
        );
    }

    #[test]
    fn non_numeric_levels_become_zero_and_out_of_range_passes_through() {
        let entries = json!([
            {"description": "a", "impact_level": "severe"},
            {"description": "b", "impact_level": 9},
            {"description": "c", "impact_level": 2.7},
            {"description": "d", "impact_level": [1]}
        ]);
        let levels: Vec<i64> = normalize_consequences(entries.as_array().unwrap())
            .into_iter()
            .map(|entry| entry.impact_level)
            .collect();
        assert_eq!(levels, vec![0, 9, 2, 0]);
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let entries = json!(["loose text", 42, null, {"description": "kept"}]);
        let normalized = normalize_consequences(entries.as_array().unwrap());
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].description, "kept");
    }

    #[test]
    fn normalizing_normalized_entries_is_identity() {
        let raw = json!([
            {"desc": "Extreme weather", "level": "5", "iconName": "cloud-showers-heavy"},
            {"text": "Biodiversity loss", "impactLevel": 4}
        ]);
        let once = normalize_consequences(raw.as_array().unwrap());

        let canonical = serde_json::to_value(&once).unwrap();
        let twice = normalize_consequences(canonical.as_array().unwrap());

        assert_eq!(once, twice);
    }
}
