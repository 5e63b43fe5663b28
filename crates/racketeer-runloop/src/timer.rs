//! Timer service - cancellable repeating and one-shot timers.
//!
//! Each timer is a tokio task driven by a `CancellationToken`. Callbacks of a
//! single timer run one after another inside that task, so a repeating timer
//! never overlaps with itself. Cancelling stops future fires; a callback that
//! is already running is allowed to finish.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Kind of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Repeating,
    Once,
}

/// Live timer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerUsage {
    pub intervals: usize,
    pub timeouts: usize,
}

impl TimerUsage {
    pub fn total(&self) -> usize {
        self.intervals + self.timeouts
    }
}

struct Registered {
    name: String,
    kind: TimerKind,
    token: CancellationToken,
}

type Registry = Arc<DashMap<u64, Registered>>;

/// Handle to a scheduled timer.
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::cancel`].
#[derive(Clone)]
pub struct TimerHandle {
    id: u64,
    name: Arc<str>,
    kind: TimerKind,
    token: CancellationToken,
    fire_count: Arc<AtomicU64>,
    registry: Registry,
}

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_repeating(&self) -> bool {
        self.kind == TimerKind::Repeating
    }

    /// Whether the timer may still fire.
    pub fn is_valid(&self) -> bool {
        !self.token.is_cancelled() && self.registry.contains_key(&self.id)
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count.load(Ordering::Relaxed)
    }

    /// Cancel the timer. Cancelling twice is a no-op.
    pub fn cancel(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.registry.remove(&self.id);
        debug!("Timer {}#{} cancelled", self.name, self.id);
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Schedules timers on the tokio runtime and tracks the live ones.
#[derive(Default)]
pub struct TimerService {
    registry: Registry,
    next_id: AtomicU64,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `callback` every `interval`, first fire one interval from now.
    pub fn repeating<F, Fut>(&self, name: &str, interval: Duration, callback: F) -> TimerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.repeating_after(name, interval, interval, callback)
    }

    /// Fire `callback` after `initial_delay`, then every `interval`.
    pub fn repeating_after<F, Fut>(
        &self,
        name: &str,
        initial_delay: Duration,
        interval: Duration,
        callback: F,
    ) -> TimerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let handle = self.register(name, TimerKind::Repeating);
        let token = handle.token.clone();
        let fire_count = handle.fire_count.clone();
        let registry = self.registry.clone();
        let id = handle.id;

        debug!(
            "Timer {}#{} scheduled every {}ms (first in {}ms)",
            name,
            id,
            interval.as_millis(),
            initial_delay.as_millis()
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        fire_count.fetch_add(1, Ordering::Relaxed);
                        callback().await;
                    }
                }
            }
            registry.remove(&id);
        });

        handle
    }

    /// Fire `callback` once after `delay`.
    pub fn once<F, Fut>(&self, name: &str, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = self.register(name, TimerKind::Once);
        let token = handle.token.clone();
        let fire_count = handle.fire_count.clone();
        let registry = self.registry.clone();
        let id = handle.id;

        debug!("Timer {}#{} scheduled once in {}ms", name, id, delay.as_millis());

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Not counted as live while the callback runs
                    registry.remove(&id);
                    fire_count.fetch_add(1, Ordering::Relaxed);
                    callback().await;
                }
            }
            registry.remove(&id);
        });

        handle
    }

    /// Cancel every live timer.
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<u64> = self.registry.iter().map(|entry| *entry.key()).collect();
        let mut cancelled = 0;
        for id in ids {
            if let Some((_, registered)) = self.registry.remove(&id) {
                registered.token.cancel();
                debug!("Timer {}#{} cancelled", registered.name, id);
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Count the live timers by kind.
    pub fn usage(&self) -> TimerUsage {
        let mut usage = TimerUsage::default();
        for entry in self.registry.iter() {
            match entry.kind {
                TimerKind::Repeating => usage.intervals += 1,
                TimerKind::Once => usage.timeouts += 1,
            }
        }
        usage
    }

    fn register(&self, name: &str, kind: TimerKind) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();
        self.registry.insert(
            id,
            Registered {
                name: name.to_string(),
                kind,
                token: token.clone(),
            },
        );
        TimerHandle {
            id,
            name: Arc::from(name),
            kind,
            token,
            fire_count: Arc::new(AtomicU64::new(0)),
            registry: self.registry.clone(),
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
