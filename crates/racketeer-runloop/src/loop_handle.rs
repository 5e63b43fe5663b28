//! Per-loop bookkeeping.
//!
//! A `LoopHandle` owns the active timer of one automation loop and a
//! generation counter. Every start and stop bumps the generation, so a
//! callback scheduled by an earlier run can compare the generation it was
//! created with and no-op when stale.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::timer::TimerHandle;

/// Read-only view of a loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopSnapshot {
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct LoopHandle {
    enabled: bool,
    generation: u64,
    timer: Option<TimerHandle>,
    last_run: Option<DateTime<Utc>>,
    next_run: Option<DateTime<Utc>>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the loop is enabled and no start/stop happened since
    /// `generation` was taken.
    pub fn is_current(&self, generation: u64) -> bool {
        self.enabled && self.generation == generation
    }

    /// Enable the loop. Returns the new generation, or `None` when the loop
    /// was already enabled.
    pub fn activate(&mut self) -> Option<u64> {
        if self.enabled {
            return None;
        }
        self.enabled = true;
        self.generation += 1;
        Some(self.generation)
    }

    /// Disable the loop and cancel its timer. Returns false when the loop
    /// was already stopped.
    pub fn deactivate(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.enabled = false;
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.next_run = None;
        true
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Install `timer` as the active timer, cancelling the previous one.
    pub fn replace_timer(&mut self, timer: TimerHandle) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.cancel();
        }
    }

    /// Cancel and drop the active timer without disabling the loop.
    pub fn clear_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Record a run that happened now, with the next one due after `next_in`.
    pub fn record_run(&mut self, next_in: Duration) {
        let now = Utc::now();
        self.last_run = Some(now);
        self.schedule_next(next_in);
    }

    pub fn schedule_next(&mut self, next_in: Duration) {
        let delta = chrono::Duration::from_std(next_in).unwrap_or(chrono::Duration::zero());
        self.next_run = Some(Utc::now() + delta);
    }

    pub fn snapshot(&self) -> LoopSnapshot {
        LoopSnapshot {
            enabled: self.enabled,
            last_run: self.last_run,
            next_run: self.next_run,
        }
    }
}
