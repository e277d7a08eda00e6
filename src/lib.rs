pub mod config;
pub mod domain;
pub mod models;
pub mod services;
pub mod shared;

pub use config::*;
pub use domain::errors::*;
pub use models::*;
pub use services::*;
