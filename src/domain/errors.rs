use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlaError {
    #[error("Invalid SLA policy: {0}")]
    InvalidPolicy(String),
    #[error("Invalid business calendar: {0}")]
    InvalidCalendar(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("No working time found within {days} days of {from}")]
    CalendarExhausted { days: u32, from: String },
}

pub type SlaResult<T> = Result<T, SlaError>;
