//! # Racketeer Automations
//!
//! The three automation loops and the surface that drives them:
//!
//! - [`BustScanner`]: polls the page for bust buttons on a jittered interval
//!   and pauses after every click
//! - [`AutoTrainer`]: trains a stat on a fixed interval when energy allows
//! - [`AutoCrime`]: picks the best affordable heist, GTA or crime and keeps a
//!   per-action cooldown
//! - [`Autopilot`]: owns the shared cache, settings and timers and exposes
//!   start/stop/status plus the manual actions

pub mod autopilot;
pub mod bust;
pub mod cooldown;
pub mod crime;
pub mod error;
pub mod status;
pub mod trainer;

#[cfg(test)]
mod testing;

pub use autopilot::Autopilot;
pub use bust::{BustPhase, BustScanner, pick_target};
pub use cooldown::{ActionGate, GatePermit, GateRefusal, GateState};
pub use crime::{AutoCrime, choose_action};
pub use error::AutomationError;
pub use status::{LoopKind, LoopStatus, StatusMessage};
pub use trainer::AutoTrainer;
