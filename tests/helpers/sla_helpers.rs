#![allow(dead_code)]
use chrono::{DateTime, TimeZone, Utc};
use sla_engine::{BusinessCalendar, DeadlineCalculator, SlaPolicy};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary; `RUST_LOG` controls the filter
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "sla_engine=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// UTC instant at minute precision
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("Invalid test timestamp")
}

/// Monday to Friday, 08:00-18:00
pub fn weekday_calendar() -> BusinessCalendar {
    BusinessCalendar::new(1..=5, "08:00", "18:00")
}

pub fn test_calculator() -> DeadlineCalculator {
    init_tracing();
    DeadlineCalculator::default()
}

pub fn policy(response_minutes: i64, resolution_minutes: i64) -> SlaPolicy {
    SlaPolicy::new(response_minutes, resolution_minutes)
}
