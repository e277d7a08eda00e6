pub mod calendar;
pub mod sla;

pub use calendar::*;
pub use sla::*;
