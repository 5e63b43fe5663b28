//! # Racketeer Config
//!
//! Configuration management for the Racketeer automation agent: the TOML
//! schema, a loader with environment substitution, a validator, and the
//! live settings store the loops poll at runtime.

mod error;
mod live;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use live::{
    LiveSettings, MIN_ENERGY_RANGE, SCAN_INTERVAL_RANGE_MS, TRAIN_INTERVAL_RANGE_MINUTES,
};
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
