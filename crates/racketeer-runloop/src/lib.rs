//! # Racketeer RunLoop
//!
//! Scheduling primitives for the automation loops:
//!
//! - [`TimerService`]: cancellable repeating and one-shot timers with live
//!   resource counts
//! - [`LoopHandle`]: enabled flag, active timer and generation token of one loop
//! - [`randomize`]: jittered intervals

pub mod jitter;
pub mod loop_handle;
pub mod timer;

pub use jitter::randomize;
pub use loop_handle::{LoopHandle, LoopSnapshot};
pub use timer::{TimerHandle, TimerKind, TimerService, TimerUsage};
