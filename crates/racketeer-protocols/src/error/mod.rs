//! Error types for the Racketeer protocol layer.

mod api;
mod probe;

pub use api::*;
pub use probe::*;
