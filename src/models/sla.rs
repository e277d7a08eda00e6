use crate::domain::errors::{SlaError, SlaResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ===== SLA Policy =====

/// Response and resolution budgets, in minutes of working time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaPolicy {
    pub response_budget_minutes: i64,
    pub resolution_budget_minutes: i64,
}

impl SlaPolicy {
    pub fn new(response_budget_minutes: i64, resolution_budget_minutes: i64) -> Self {
        Self {
            response_budget_minutes,
            resolution_budget_minutes,
        }
    }

    /// Build a policy from duration strings like "30m", "2h", "1d"
    pub fn from_durations(response_time: &str, resolution_time: &str) -> SlaResult<Self> {
        let response = parse_duration(response_time)
            .map_err(|e| SlaError::InvalidPolicy(format!("Invalid response time: {}", e)))?;
        let resolution = parse_duration(resolution_time)
            .map_err(|e| SlaError::InvalidPolicy(format!("Invalid resolution time: {}", e)))?;

        Ok(Self::new(response / 60, resolution / 60))
    }

    /// Both budgets must be positive. Resolution shorter than response is allowed.
    pub fn validate(&self) -> SlaResult<()> {
        if self.response_budget_minutes <= 0 {
            return Err(SlaError::InvalidPolicy(format!(
                "response budget must be at least 1 minute, got {}",
                self.response_budget_minutes
            )));
        }
        if self.resolution_budget_minutes <= 0 {
            return Err(SlaError::InvalidPolicy(format!(
                "resolution budget must be at least 1 minute, got {}",
                self.resolution_budget_minutes
            )));
        }
        Ok(())
    }
}

// ===== Deadlines =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineResult {
    #[serde(with = "crate::shared::time::iso_millis")]
    pub response_deadline: DateTime<Utc>,
    #[serde(with = "crate::shared::time::iso_millis")]
    pub resolution_deadline: DateTime<Utc>,
}

// ===== Compliance =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub response_on_time: bool,
    pub resolution_on_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_response_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_resolution_minutes: Option<i64>,
}

impl ComplianceResult {
    /// Overall outcome using "worst outcome" logic: breached > pending > met.
    ///
    /// A target with no actual event counts as breached once `now` is past its
    /// deadline, and as pending before that.
    pub fn status(&self, deadlines: &DeadlineResult, now: DateTime<Utc>) -> SlaStatus {
        let response = target_status(
            self.response_on_time,
            self.actual_response_minutes.is_some(),
            deadlines.response_deadline,
            now,
        );
        let resolution = target_status(
            self.resolution_on_time,
            self.actual_resolution_minutes.is_some(),
            deadlines.resolution_deadline,
            now,
        );

        if response == SlaStatus::Breached || resolution == SlaStatus::Breached {
            SlaStatus::Breached
        } else if response == SlaStatus::Pending || resolution == SlaStatus::Pending {
            SlaStatus::Pending
        } else {
            SlaStatus::Met
        }
    }
}

fn target_status(
    on_time: bool,
    observed: bool,
    deadline: DateTime<Utc>,
    now: DateTime<Utc>,
) -> SlaStatus {
    match (observed, on_time) {
        (true, true) => SlaStatus::Met,
        (true, false) => SlaStatus::Breached,
        (false, _) if now > deadline => SlaStatus::Breached,
        (false, _) => SlaStatus::Pending,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaStatus {
    Pending,
    Met,
    Breached,
}

impl std::fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlaStatus::Pending => write!(f, "pending"),
            SlaStatus::Met => write!(f, "met"),
            SlaStatus::Breached => write!(f, "breached"),
        }
    }
}

impl std::str::FromStr for SlaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SlaStatus::Pending),
            "met" => Ok(SlaStatus::Met),
            "breached" => Ok(SlaStatus::Breached),
            _ => Err(format!("Invalid SLA status: {}", s)),
        }
    }
}

// ===== Duration Parsing Utility =====

use regex::Regex;
use std::sync::OnceLock;

/// Parse duration string like "2h", "30m", "1d" into seconds
pub fn parse_duration(duration_str: &str) -> Result<i64, String> {
    static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = DURATION_REGEX
        .get_or_init(|| Regex::new(r"^(\d+)([hmd])$").expect("Invalid duration regex"));

    let caps = re.captures(duration_str).ok_or_else(|| {
        format!(
            "Invalid duration format: {}. Expected format: <number><m|h|d>",
            duration_str
        )
    })?;

    let number: i64 = caps[1]
        .parse()
        .map_err(|_| format!("Invalid number in duration: {}", &caps[1]))?;

    let multiplier = match &caps[2] {
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        unit => return Err(format!("Invalid duration unit: {}", unit)),
    };

    let seconds = number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Duration too large: {}", duration_str))?;

    if seconds <= 0 {
        return Err("Duration must be greater than 0".to_string());
    }

    Ok(seconds)
}
