#![allow(unused_imports)]
pub mod sla_helpers;

pub use sla_helpers::*;
