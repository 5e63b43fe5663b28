//! DOM probe errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Probe unavailable: {0}")]
    Unavailable(String),

    #[error("Element {0} is no longer attached to the page")]
    ElementGone(usize),

    #[error("Probe script failed: {0}")]
    Script(String),
}
