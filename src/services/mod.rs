pub mod compliance_checker;
pub mod deadline_calculator;

pub use compliance_checker::*;
pub use deadline_calculator::*;
