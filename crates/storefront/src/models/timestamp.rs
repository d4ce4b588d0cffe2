//! Lenient timestamp decoding.
//!
//! The backend emits RFC 3339 timestamps for some fields and naive
//! `YYYY-MM-DDTHH:MM:SS[.ffffff]` values (implicitly UTC) for others.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse either an RFC 3339 timestamp or a naive UTC one.
#[must_use]
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// `deserialize_with` adapter for `DateTime<Utc>` fields.
///
/// # Errors
///
/// Fails if the value is not a string in one of the accepted formats.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `deserialize_with` adapter for optional timestamps.
///
/// # Errors
///
/// Fails if a present value is not a string in one of the accepted formats.
pub fn deserialize_option<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_both_formats() {
        let zoned = parse("2023-04-15T10:30:00Z").map(|dt| dt.timestamp());
        let naive = parse("2023-04-15T10:30:00").map(|dt| dt.timestamp());
        let fractional = parse("2023-04-15T10:30:00.123456").map(|dt| dt.timestamp());
        assert_eq!(zoned, Some(1_681_554_600));
        assert_eq!(naive, zoned);
        assert_eq!(fractional, zoned);
        assert!(parse("yesterday").is_none());
    }
}
