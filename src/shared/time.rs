use crate::domain::errors::{SlaError, SlaResult};
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Format a UTC instant as ISO-8601 with millisecond precision, e.g. `2024-01-01T00:30:00.000Z`
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp with any offset and normalize it to UTC
pub fn parse_timestamp(value: &str) -> SlaResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SlaError::InvalidTimestamp(format!("{}: {}", value, e)))
}

/// Parse a shift boundary in strict `HH:MM` form
pub fn parse_shift_time(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Map a local civil time onto an absolute instant.
///
/// Ambiguous times (clocks turned back) resolve to the earlier instant. Times that
/// fall inside a gap (clocks turned forward) resolve to the first instant after it.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime) -> SlaResult<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Gaps are at most a few hours; walk forward until the zone has a mapping
            for step in 1..=24 * 60 {
                let candidate = local + Duration::minutes(step);
                if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
                    return Ok(dt.with_timezone(&Utc));
                }
            }
            Err(SlaError::InvalidCalendar(format!(
                "local time {} does not exist in timezone {}",
                local,
                tz.name()
            )))
        }
    }
}

/// Serde adapter writing `DateTime<Utc>` through [`format_timestamp`]
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_timestamp_uses_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-01T00:30:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_normalizes_offset() {
        let ts = parse_timestamp("2024-01-01T10:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(SlaError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_parse_shift_time() {
        assert_eq!(parse_shift_time("08:00"), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(parse_shift_time("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert!(parse_shift_time("8:00").is_none());
        assert!(parse_shift_time("24:00").is_none());
        assert!(parse_shift_time("08-00").is_none());
        assert!(parse_shift_time("").is_none());
    }

    #[test]
    fn test_resolve_local_gap_moves_forward() {
        // 2024-03-31 02:30 does not exist in Europe/Madrid (clocks jump 02:00 -> 03:00)
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        let local = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(&tz, local).unwrap();
        // 03:00 CEST == 01:00 UTC
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_local_ambiguous_takes_earlier() {
        // 2024-10-27 02:30 happens twice in Europe/Madrid
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        let local = NaiveDate::from_ymd_opt(2024, 10, 27)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(&tz, local).unwrap();
        // First occurrence is still CEST (+02:00)
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap());
    }
}
