//! Forgiving readers for stored records.
//!
//! A single record with a blank date or an outcome outside the known set
//! must not make the whole collection unreadable, so these fall back to a
//! default instead of failing.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Date used for blank or unreadable stored dates.
pub fn fallback_date() -> NaiveDate {
    DateTime::UNIX_EPOCH.date_naive()
}

/// Reads a `YYYY-MM-DD` date. A trailing time part is ignored; anything else
/// becomes [`fallback_date`].
pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let parsed = raw
        .as_str()
        .and_then(|text| text.trim().get(..10))
        .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok());
    Ok(parsed.unwrap_or_else(|| {
        tracing::debug!("Unreadable stored date {raw}, using {}", fallback_date());
        fallback_date()
    }))
}

/// Reads an optional outcome; blank or unknown text is unset.
pub fn outcome<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = raw.as_str().and_then(|text| text.parse().ok());
    if parsed.is_none() && raw.as_str().is_some_and(|text| !text.trim().is_empty()) {
        tracing::debug!("Unknown stored outcome {raw}, leaving it unset");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::domain::CheckResult;

    #[derive(Deserialize)]
    struct Dated {
        #[serde(deserialize_with = "date")]
        day: NaiveDate,
        #[serde(default, deserialize_with = "outcome")]
        check: Option<CheckResult>,
    }

    fn read(json: &str) -> Dated {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn dates_accept_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(read(r#"{"day": "2024-03-15"}"#).day, expected);
        assert_eq!(read(r#"{"day": "2024-03-15T10:00:00.000Z"}"#).day, expected);
    }

    #[test]
    fn blank_or_garbage_dates_fall_back() {
        for raw in [r#""""#, r#""15.3.2024""#, "null", "20240315"] {
            let json = format!(r#"{{"day": {raw}}}"#);
            assert_eq!(read(&json).day, fallback_date(), "input {raw}");
        }
    }

    #[test]
    fn unknown_outcomes_are_unset() {
        assert_eq!(
            read(r#"{"day": "", "check": "Závada"}"#).check,
            Some(CheckResult::Defect)
        );
        assert_eq!(read(r#"{"day": "", "check": ""}"#).check, None);
        assert_eq!(read(r#"{"day": "", "check": "maybe"}"#).check, None);
        assert_eq!(read(r#"{"day": ""}"#).check, None);
    }
}
