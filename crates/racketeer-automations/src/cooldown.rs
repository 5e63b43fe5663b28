//! Per-action cooldown gate shared by the manual and automatic crime paths.
//!
//! `Ready -> Attempting -> Cooling(n) -> ... -> Ready`
//!
//! The gate is checked and taken under one lock, so two attempts can never
//! be in flight together. Taking it hands out a [`GatePermit`]; a permit
//! dropped without a cooldown gives the gate back. The countdown is a chain of one-second one-shot
//! timers, each carrying the generation of the cooldown that created it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use racketeer_runloop::{TimerHandle, TimerService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Ready,
    Attempting,
    Cooling { remaining: u64 },
}

/// Why the gate refused an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRefusal {
    Cooling(u64),
    Busy,
}

struct Inner {
    state: GateState,
    generation: u64,
    tick: Option<TimerHandle>,
}

pub struct ActionGate {
    timers: Arc<TimerService>,
    inner: Mutex<Inner>,
}

impl ActionGate {
    pub fn new(timers: Arc<TimerService>) -> Arc<Self> {
        Arc::new(Self {
            timers,
            inner: Mutex::new(Inner {
                state: GateState::Ready,
                generation: 0,
                tick: None,
            }),
        })
    }

    pub fn state(&self) -> GateState {
        self.inner.lock().state
    }

    /// Seconds left on the active cooldown, zero when none.
    pub fn remaining(&self) -> u64 {
        match self.inner.lock().state {
            GateState::Cooling { remaining } => remaining,
            _ => 0,
        }
    }

    /// Take the gate for one attempt.
    pub fn try_acquire(self: &Arc<Self>) -> Result<GatePermit, GateRefusal> {
        let mut inner = self.inner.lock();
        match inner.state {
            GateState::Ready => {
                inner.state = GateState::Attempting;
                Ok(GatePermit {
                    gate: self.clone(),
                    settled: false,
                })
            }
            GateState::Attempting => Err(GateRefusal::Busy),
            GateState::Cooling { remaining } => Err(GateRefusal::Cooling(remaining)),
        }
    }

    fn release(&self) {
        let mut inner = self.inner.lock();
        if inner.state == GateState::Attempting {
            inner.state = GateState::Ready;
        }
    }

    /// Start a cooldown of `secs` seconds. Zero goes straight back to `Ready`.
    pub fn start_cooldown(self: &Arc<Self>, secs: u64) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if let Some(previous) = inner.tick.take() {
            previous.cancel();
        }
        if secs == 0 {
            inner.state = GateState::Ready;
            return;
        }
        inner.state = GateState::Cooling { remaining: secs };
        debug!("Action cooldown started ({}s)", secs);
        let generation = inner.generation;
        inner.tick = Some(self.schedule_tick(generation));
    }

    fn schedule_tick(self: &Arc<Self>, generation: u64) -> TimerHandle {
        let this = self.clone();
        self.timers
            .once("crime-cooldown", Duration::from_secs(1), move || async move {
                this.tick(generation)
            })
    }

    fn tick(self: &Arc<Self>, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return;
        }
        let GateState::Cooling { remaining } = inner.state else {
            return;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            inner.state = GateState::Ready;
            inner.tick = None;
            debug!("Action cooldown finished");
        } else {
            inner.state = GateState::Cooling { remaining };
            inner.tick = Some(self.schedule_tick(generation));
        }
    }
}

/// An attempt in progress. Settle it with [`GatePermit::cooldown`], or drop
/// it to return the gate to `Ready`.
#[must_use = "dropping the permit releases the gate"]
pub struct GatePermit {
    gate: Arc<ActionGate>,
    settled: bool,
}

impl GatePermit {
    /// Finish the attempt with a cooldown of `secs` seconds.
    pub fn cooldown(mut self, secs: u64) {
        self.settled = true;
        self.gate.start_cooldown(secs);
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_acquire_then_busy() {
        let gate = ActionGate::new(Arc::new(TimerService::new()));
        let permit = gate.try_acquire().unwrap();
        assert!(matches!(gate.try_acquire(), Err(GateRefusal::Busy)));
        drop(permit);
        assert_eq!(gate.state(), GateState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_attempt_frees_gate() {
        let gate = ActionGate::new(Arc::new(TimerService::new()));
        let held = gate.clone();
        let attempt = async move {
            let _permit = held.try_acquire().unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        };
        let outcome = tokio::time::timeout(Duration::from_secs(5), attempt).await;
        assert!(outcome.is_err());
        assert_eq!(gate.state(), GateState::Ready);
        assert!(gate.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reaches_ready() {
        let timers = Arc::new(TimerService::new());
        let gate = ActionGate::new(timers.clone());
        gate.try_acquire().unwrap().cooldown(10);

        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert!(matches!(gate.try_acquire(), Err(GateRefusal::Cooling(5))));
        assert_eq!(gate.remaining(), 5);

        tokio::time::sleep(Duration::from_millis(5600)).await;
        assert_eq!(gate.state(), GateState::Ready);
        assert_eq!(timers.usage().total(), 0);
        assert!(gate.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cooldown_is_ready_immediately() {
        let timers = Arc::new(TimerService::new());
        let gate = ActionGate::new(timers.clone());
        gate.try_acquire().unwrap().cooldown(0);
        assert_eq!(gate.state(), GateState::Ready);
        assert_eq!(timers.usage().total(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_cooldown_supersedes_old_countdown() {
        let gate = ActionGate::new(Arc::new(TimerService::new()));
        gate.start_cooldown(3);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        gate.start_cooldown(5);

        tokio::time::sleep(Duration::from_millis(3200)).await;
        assert_eq!(gate.remaining(), 2);
    }
}
