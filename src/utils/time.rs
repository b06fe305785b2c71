//! Serde helpers for backend timestamps.
//!
//! The backend emits ISO-8601 strings.  Timestamps that carry an offset are
//! parsed as RFC 3339; timestamps without one are taken to be UTC.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const NAIVE_ISO8601: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Parse a backend timestamp, accepting both offset and naive forms.
pub fn parse(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    match OffsetDateTime::parse(s, &Rfc3339) {
        Ok(datetime) => Ok(datetime),
        Err(err) => PrimitiveDateTime::parse(s, NAIVE_ISO8601)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|_| err),
    }
}

/// Deserialize an ISO-8601 formatted string into an OffsetDateTime
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

/// Serialize an OffsetDateTime into an RFC 3339 formatted string
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = datetime
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

/// Same as the parent module, for optional fields.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    /// Deserialize an optional ISO-8601 string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }

    /// Serialize an optional OffsetDateTime as RFC 3339 or null.
    pub fn serialize<S>(datetime: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match datetime {
            Some(datetime) => super::serialize(datetime, serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(parsed, datetime!(2024-03-01 10:30:00 UTC));
    }

    #[test]
    fn parses_zulu() {
        let parsed = parse("2024-03-01T12:30:00.250Z").unwrap();
        assert_eq!(parsed, datetime!(2024-03-01 12:30:00.25 UTC));
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let parsed = parse("2024-03-01T12:30:00.123456").unwrap();
        assert_eq!(parsed, datetime!(2024-03-01 12:30:00.123456 UTC));
        let parsed = parse("2024-03-01T12:30:00").unwrap();
        assert_eq!(parsed, datetime!(2024-03-01 12:30:00 UTC));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse("yesterday").is_err());
    }
}
