use crate::{
    config::EngineConfig,
    domain::errors::{SlaError, SlaResult},
    models::{BusinessCalendar, DeadlineResult, SlaPolicy, WorkingSchedule},
    shared::time::{format_timestamp, parse_timestamp},
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace, warn};

/// Computes response and resolution deadlines from an opening time, an SLA
/// policy and an optional business calendar
#[derive(Clone, Debug, Default)]
pub struct DeadlineCalculator {
    config: EngineConfig,
}

impl DeadlineCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute both deadlines.
    ///
    /// Each deadline is walked independently from `opened_at`; the resolution
    /// deadline is never derived from the response deadline.
    pub fn compute_deadlines(
        &self,
        opened_at: DateTime<Utc>,
        policy: &SlaPolicy,
        calendar: Option<&BusinessCalendar>,
    ) -> SlaResult<DeadlineResult> {
        policy.validate()?;
        let schedule = self.resolve_schedule(calendar)?;

        let response_deadline =
            self.walk(opened_at, policy.response_budget_minutes, schedule.as_ref())?;
        let resolution_deadline =
            self.walk(opened_at, policy.resolution_budget_minutes, schedule.as_ref())?;

        match &schedule {
            Some(s) => debug!(
                "Computed SLA deadlines with business hours (timezone: {}) from {} (response: {}, resolution: {})",
                s.timezone().name(),
                format_timestamp(opened_at),
                format_timestamp(response_deadline),
                format_timestamp(resolution_deadline)
            ),
            None => debug!(
                "Computed SLA deadlines (24/7) from {} (response: {}, resolution: {})",
                format_timestamp(opened_at),
                format_timestamp(response_deadline),
                format_timestamp(resolution_deadline)
            ),
        }

        Ok(DeadlineResult {
            response_deadline,
            resolution_deadline,
        })
    }

    /// Same as [`Self::compute_deadlines`] with an RFC 3339 opening time
    pub fn compute_deadlines_rfc3339(
        &self,
        opened_at: &str,
        policy: &SlaPolicy,
        calendar: Option<&BusinessCalendar>,
    ) -> SlaResult<DeadlineResult> {
        let opened_at = parse_timestamp(opened_at)?;
        self.compute_deadlines(opened_at, policy, calendar)
    }

    /// Compute a single deadline for an arbitrary budget of working minutes
    pub fn compute_deadline(
        &self,
        opened_at: DateTime<Utc>,
        budget_minutes: i64,
        calendar: Option<&BusinessCalendar>,
    ) -> SlaResult<DateTime<Utc>> {
        if budget_minutes <= 0 {
            return Err(SlaError::InvalidPolicy(format!(
                "budget must be at least 1 minute, got {}",
                budget_minutes
            )));
        }
        let schedule = self.resolve_schedule(calendar)?;
        self.walk(opened_at, budget_minutes, schedule.as_ref())
    }

    fn resolve_schedule(
        &self,
        calendar: Option<&BusinessCalendar>,
    ) -> SlaResult<Option<WorkingSchedule>> {
        match calendar {
            Some(calendar) => calendar.validate(self.config.default_timezone),
            None => Ok(None),
        }
    }

    /// Consume `budget_minutes` of working time starting at `opened_at`.
    ///
    /// Working time accrues only inside `[shift_start, shift_end)` on working
    /// days. Without a schedule the budget is plain elapsed time.
    fn walk(
        &self,
        opened_at: DateTime<Utc>,
        budget_minutes: i64,
        schedule: Option<&WorkingSchedule>,
    ) -> SlaResult<DateTime<Utc>> {
        let mut remaining = Duration::try_minutes(budget_minutes).ok_or_else(|| {
            SlaError::InvalidPolicy(format!("budget of {} minutes is too large", budget_minutes))
        })?;

        let schedule = match schedule {
            Some(schedule) => schedule,
            None => return advance(opened_at, remaining),
        };

        let mut cursor = opened_at;
        let mut date = schedule.local_date(opened_at);

        for _ in 0..self.config.max_walk_days {
            if schedule.is_working_day(date) {
                let (shift_start, shift_end) = schedule.shift_window(date)?;

                if cursor < shift_start {
                    cursor = shift_start;
                }

                if cursor < shift_end {
                    let left_in_shift = shift_end - cursor;
                    if remaining <= left_in_shift {
                        return advance(cursor, remaining);
                    }
                    remaining = remaining - left_in_shift;
                    cursor = shift_end;
                }

                trace!(
                    "SLA walk passed {} with {} minutes remaining",
                    date,
                    remaining.num_minutes()
                );
            }

            date = date.succ_opt().ok_or_else(|| {
                SlaError::InvalidTimestamp(format!("calendar overflow after {}", date))
            })?;
        }

        warn!(
            "SLA walk from {} exhausted {} days with {} minutes still unconsumed",
            format_timestamp(opened_at),
            self.config.max_walk_days,
            remaining.num_minutes()
        );

        Err(SlaError::CalendarExhausted {
            days: self.config.max_walk_days,
            from: format_timestamp(opened_at),
        })
    }
}

fn advance(from: DateTime<Utc>, by: Duration) -> SlaResult<DateTime<Utc>> {
    from.checked_add_signed(by).ok_or_else(|| {
        SlaError::InvalidPolicy(format!(
            "deadline {} minutes after {} is out of range",
            by.num_minutes(),
            format_timestamp(from)
        ))
    })
}

/// Compute deadlines with the default configuration (UTC calendars, ten-year walk cap)
pub fn compute_deadlines(
    opened_at: DateTime<Utc>,
    policy: &SlaPolicy,
    calendar: Option<&BusinessCalendar>,
) -> SlaResult<DeadlineResult> {
    DeadlineCalculator::default().compute_deadlines(opened_at, policy, calendar)
}
