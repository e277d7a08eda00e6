use crate::{
    domain::errors::SlaResult,
    models::{ComplianceResult, DeadlineResult},
    shared::time::{format_timestamp, parse_timestamp},
};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Classify actual response/resolution times against their deadlines.
///
/// A missing actual timestamp is reported as on time. An actual timestamp equal
/// to its deadline is on time.
pub fn check_compliance(
    opened_at: DateTime<Utc>,
    response_deadline: DateTime<Utc>,
    resolution_deadline: DateTime<Utc>,
    actual_response_at: Option<DateTime<Utc>>,
    actual_resolution_at: Option<DateTime<Utc>>,
) -> ComplianceResult {
    let result = ComplianceResult {
        response_on_time: actual_response_at.map_or(true, |at| at <= response_deadline),
        resolution_on_time: actual_resolution_at.map_or(true, |at| at <= resolution_deadline),
        actual_response_minutes: actual_response_at.map(|at| elapsed_minutes(opened_at, at)),
        actual_resolution_minutes: actual_resolution_at.map(|at| elapsed_minutes(opened_at, at)),
    };

    if !result.response_on_time {
        debug!(
            "Response SLA breached (deadline: {}, responded after {} minutes)",
            format_timestamp(response_deadline),
            result.actual_response_minutes.unwrap_or_default()
        );
    }
    if !result.resolution_on_time {
        debug!(
            "Resolution SLA breached (deadline: {}, resolved after {} minutes)",
            format_timestamp(resolution_deadline),
            result.actual_resolution_minutes.unwrap_or_default()
        );
    }

    result
}

pub fn check_compliance_for(
    opened_at: DateTime<Utc>,
    deadlines: &DeadlineResult,
    actual_response_at: Option<DateTime<Utc>>,
    actual_resolution_at: Option<DateTime<Utc>>,
) -> ComplianceResult {
    check_compliance(
        opened_at,
        deadlines.response_deadline,
        deadlines.resolution_deadline,
        actual_response_at,
        actual_resolution_at,
    )
}

/// RFC 3339 variant for callers holding persisted timestamps
pub fn check_compliance_rfc3339(
    opened_at: &str,
    deadlines: &DeadlineResult,
    actual_response_at: Option<&str>,
    actual_resolution_at: Option<&str>,
) -> SlaResult<ComplianceResult> {
    let opened_at = parse_timestamp(opened_at)?;
    let actual_response_at = actual_response_at.map(parse_timestamp).transpose()?;
    let actual_resolution_at = actual_resolution_at.map(parse_timestamp).transpose()?;

    Ok(check_compliance_for(
        opened_at,
        deadlines,
        actual_response_at,
        actual_resolution_at,
    ))
}

/// Whole minutes between two instants, floored
fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(60_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn opened() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_elapsed_minutes_floors() {
        let at = opened() + Duration::seconds(20 * 60 + 59);
        assert_eq!(elapsed_minutes(opened(), at), 20);

        // Event recorded before opening floors towards the past
        let early = opened() - Duration::seconds(30);
        assert_eq!(elapsed_minutes(opened(), early), -1);
    }

    #[test]
    fn test_one_millisecond_late_is_breach() {
        let deadline = opened() + Duration::minutes(30);
        let result = check_compliance(
            opened(),
            deadline,
            deadline,
            Some(deadline + Duration::milliseconds(1)),
            None,
        );
        assert!(!result.response_on_time);
        assert_eq!(result.actual_response_minutes, Some(30));
        assert!(result.resolution_on_time);
        assert_eq!(result.actual_resolution_minutes, None);
    }

    #[test]
    fn test_rfc3339_rejects_bad_actual() {
        let deadlines = DeadlineResult {
            response_deadline: opened() + Duration::minutes(30),
            resolution_deadline: opened() + Duration::minutes(60),
        };
        let result = check_compliance_rfc3339(
            "2024-01-01T00:00:00Z",
            &deadlines,
            Some("later"),
            None,
        );
        assert!(result.is_err());
    }
}
