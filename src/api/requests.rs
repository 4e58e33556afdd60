//! API request structures

use serde::Deserialize;
use serde_json::Value;

use crate::utils::parse_field;

/// Body of `POST /timers`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTimerRequest {
    /// Default duration of the new timer; the configured default when absent
    pub default_minutes: Option<u64>,
}

/// Body of `PUT /timers/:id/duration`.
///
/// Fields arrive straight from number inputs, so they may be numbers,
/// strings, empty or missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub hours: Value,
    #[serde(default)]
    pub minutes: Value,
    #[serde(default)]
    pub seconds: Value,
}

impl DurationRequest {
    /// Hours, minutes and seconds, each coerced to 0 when unusable
    pub fn fields(&self) -> (i64, i64, i64) {
        (
            coerce_field(&self.hours),
            coerce_field(&self.minutes),
            coerce_field(&self.seconds),
        )
    }
}

/// Body of `PUT /timers/:id/name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

fn coerce_field(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_field(s),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_fields_accept_numbers_and_strings() {
        let request: DurationRequest =
            serde_json::from_str(r#"{"hours": "1", "minutes": 2.7, "seconds": ""}"#).unwrap();
        assert_eq!(request.fields(), (1, 2, 0));
    }

    #[test]
    fn missing_or_odd_fields_are_zero() {
        let request: DurationRequest =
            serde_json::from_str(r#"{"minutes": null, "seconds": [5]}"#).unwrap();
        assert_eq!(request.fields(), (0, 0, 0));
    }
}
