//! Datetime serialization/deserialization helpers.
//!
//! Deployment history arrives from whichever frontend persisted it, so the
//! `when` field tolerates both RFC3339 strings and Unix timestamps:
//! - Serialization: `DateTime<Utc>` -> RFC3339 string
//! - Deserialization: RFC3339 string or Unix timestamp -> `DateTime<Utc>`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from RFC3339 or Unix timestamp.
///
/// Unix timestamps are auto-detected as seconds or milliseconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimestampOrString {
        String(String),
        I64(i64),
    }

    match TimestampOrString::deserialize(deserializer)? {
        TimestampOrString::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
        TimestampOrString::I64(ts) => {
            parse_unix_timestamp(ts).ok_or_else(|| Error::custom("Invalid Unix timestamp"))
        }
    }
}

/// Parses a Unix timestamp with second/millisecond auto-detection.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // Values larger than 10^11 are interpreted as milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        when: DateTime<Utc>,
    }

    #[test]
    fn roundtrips_rfc3339() {
        let json = r#"{"when":"2024-05-01T12:00:00+00:00"}"#;
        let w: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(w.when.timestamp(), 1_714_564_800);
        let out = serde_json::to_string(&w).unwrap();
        assert!(out.contains("2024-05-01T12:00:00"));
    }

    #[test]
    fn accepts_unix_seconds_and_millis() {
        let w: Wrapper = serde_json::from_str(r#"{"when":1714564800}"#).unwrap();
        assert_eq!(w.when.timestamp(), 1_714_564_800);

        let w: Wrapper = serde_json::from_str(r#"{"when":1714564800000}"#).unwrap();
        assert_eq!(w.when.timestamp(), 1_714_564_800);
    }
}
