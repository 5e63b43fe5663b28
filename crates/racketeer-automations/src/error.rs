//! Outcomes of manual actions that did not go through.

use thiserror::Error;

use racketeer_protocols::{ActionKind, ApiError};

/// Why a manual training or action call did not succeed.
///
/// The `Display` text is what the loop reports in its results area.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AutomationError {
    #[error("Failed to fetch character updates")]
    Unavailable,

    #[error("Not enough energy ({current}/{required})")]
    NotEnoughEnergy { current: String, required: u32 },

    #[error("Wait {0}s before next action")]
    CoolingDown(u64),

    #[error("Another action is already in progress")]
    Busy,

    #[error("Cannot commit crimes while in jail")]
    InJail,

    #[error("Training failed: {0}")]
    Training(#[source] ApiError),

    #[error("{kind} failed: {source}")]
    Action {
        kind: ActionKind,
        #[source]
        source: ApiError,
    },
}

impl AutomationError {
    /// A local gate refused the call; nothing reached the network.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AutomationError::NotEnoughEnergy { .. }
                | AutomationError::CoolingDown(_)
                | AutomationError::Busy
                | AutomationError::InJail
        )
    }
}
