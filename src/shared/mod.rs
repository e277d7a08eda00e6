/// Timestamp formatting and timezone helpers
pub mod time;
