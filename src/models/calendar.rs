use crate::domain::errors::{SlaError, SlaResult};
use crate::shared::time::{parse_shift_time, resolve_local};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ===== Business Calendar =====

/// Working days and daily shift window of a support group.
///
/// Days of week use `0 = Sunday` through `6 = Saturday`. Shift boundaries are
/// `"HH:MM"` in the calendar's local time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCalendar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>, // IANA timezone (e.g., "America/New_York")
    #[serde(default)]
    pub working_days: BTreeSet<u8>,
    #[serde(default)]
    pub shift_start: Option<String>,
    #[serde(default)]
    pub shift_end: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holidays: Vec<Holiday>,
}

impl BusinessCalendar {
    pub fn new(
        working_days: impl IntoIterator<Item = u8>,
        shift_start: &str,
        shift_end: &str,
    ) -> Self {
        Self {
            timezone: None,
            working_days: working_days.into_iter().collect(),
            shift_start: Some(shift_start.to_string()),
            shift_end: Some(shift_end.to_string()),
            holidays: Vec::new(),
        }
    }

    pub fn with_timezone(mut self, timezone: &str) -> Self {
        self.timezone = Some(timezone.to_string());
        self
    }

    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    /// A calendar without working days or without both shift boundaries means 24/7
    pub fn is_set(&self) -> bool {
        !self.working_days.is_empty() && self.shift_start.is_some() && self.shift_end.is_some()
    }

    /// Check the calendar and resolve it into a [`WorkingSchedule`].
    ///
    /// Returns `Ok(None)` for an unset calendar.
    pub fn validate(&self, default_timezone: Tz) -> SlaResult<Option<WorkingSchedule>> {
        if let Some(day) = self.working_days.iter().find(|d| **d > 6) {
            return Err(SlaError::InvalidCalendar(format!(
                "working day {} is outside 0-6",
                day
            )));
        }

        let tz = match &self.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| SlaError::InvalidCalendar(format!("unknown timezone: {}", name)))?,
            None => default_timezone,
        };

        let (start, end) = match (&self.shift_start, &self.shift_end) {
            (Some(start), Some(end)) if !self.working_days.is_empty() => (start, end),
            _ => return Ok(None),
        };

        let shift_start = parse_shift_time(start).ok_or_else(|| {
            SlaError::InvalidCalendar(format!("shift start must be HH:MM, got {:?}", start))
        })?;
        let shift_end = parse_shift_time(end).ok_or_else(|| {
            SlaError::InvalidCalendar(format!("shift end must be HH:MM, got {:?}", end))
        })?;

        if shift_start >= shift_end {
            return Err(SlaError::InvalidCalendar(format!(
                "shift end {} must be after shift start {}",
                end, start
            )));
        }

        let mut working_days = [false; 7];
        for day in &self.working_days {
            working_days[*day as usize] = true;
        }

        Ok(Some(WorkingSchedule {
            tz,
            working_days,
            shift_start,
            shift_end,
            holidays: self.holidays.clone(),
        }))
    }
}

// ===== Holiday =====

/// Holiday calendar entry; a holiday is never a working day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate, // YYYY-MM-DD
    #[serde(default)]
    pub recurring: bool, // If true, repeats annually on same month-day
}

impl Holiday {
    pub fn new(name: &str, date: NaiveDate, recurring: bool) -> Self {
        Self {
            name: name.to_string(),
            date,
            recurring,
        }
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}

// ===== Working Schedule =====

/// A validated calendar ready for deadline arithmetic
#[derive(Debug, Clone)]
pub struct WorkingSchedule {
    tz: Tz,
    working_days: [bool; 7],
    shift_start: NaiveTime,
    shift_end: NaiveTime,
    holidays: Vec<Holiday>,
}

impl WorkingSchedule {
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local civil date of an instant in this schedule's timezone
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as usize;
        self.working_days[weekday] && !self.holidays.iter().any(|h| h.falls_on(date))
    }

    /// Absolute `[start, end)` of the shift on a local date
    pub fn shift_window(&self, date: NaiveDate) -> SlaResult<(DateTime<Utc>, DateTime<Utc>)> {
        let start = resolve_local(&self.tz, date.and_time(self.shift_start))?;
        let end = resolve_local(&self.tz, date.and_time(self.shift_end))?;
        Ok((start, end))
    }
}
