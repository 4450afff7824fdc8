//! Serde adapter for optional claim timestamps.
//!
//! Written as RFC 3339 UTC with microseconds so lexical order matches time order.
//! On read: empty string or null is "never", RFC 3339 keeps its offset and
//! naive ISO-8601 (as left behind by older ledger files) is taken as UTC.
//! Anything else is logged and read as "never".

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::strings::logs;

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&format(ts)),
        None => serializer.serialize_str(""),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(read))
}

/// A corrupt value only loses its own claim time, never the surrounding record.
fn read(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => {
            let ts = parse(s.trim());
            if ts.is_none() {
                tracing::warn!("{}", logs::timestamp_invalid(s));
            }
            ts
        }
        other => {
            tracing::warn!("{}", logs::timestamp_invalid(&other.to_string()));
            None
        }
    }
}

pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_accepts_legacy_naive_iso() {
        let ts = parse("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
                + chrono::Duration::microseconds(123456)
        );
        assert!(parse("2024-05-01T10:00:00").is_some());
    }

    #[test]
    fn test_parse_normalises_offsets() {
        let ts = parse("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_format_is_sortable() {
        let early = Utc.with_ymd_and_hms(2024, 1, 9, 23, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 10, 1, 0, 0).unwrap();
        assert_eq!(format(&early), "2024-01-09T23:00:00.000000Z");
        assert!(format(&early) < format(&late));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse("yesterday").is_none());
    }

    #[derive(serde::Deserialize)]
    struct Slot {
        #[serde(default, with = "crate::domain::timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn slot(json: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Slot>(json).unwrap().at
    }

    #[test]
    fn test_unreadable_values_read_as_never() {
        assert_eq!(slot(r#"{"at":"not-a-date"}"#), None);
        assert_eq!(slot(r#"{"at":1714557600}"#), None);
        assert_eq!(slot(r#"{"at":{"nested":true}}"#), None);
        assert_eq!(slot(r#"{"at":"  "}"#), None);
        assert_eq!(slot(r#"{"at":null}"#), None);
        assert_eq!(slot(r#"{}"#), None);
        assert_eq!(
            slot(r#"{"at":"2024-05-01T10:00:00Z"}"#),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
    }
}
