//! Character state cache.
//!
//! Single owner of the current character snapshot. Concurrent callers are
//! collapsed onto one in-flight fetch, fetch starts are spaced by the refresh
//! cooldown, and the number of callers allowed to wait is bounded.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use racketeer_config::ThrottlingConfig;
use racketeer_protocols::{CharacterState, GameApi};

use crate::stats::{CacheCounters, CacheStats};

type Waiter = oneshot::Sender<Option<Arc<CharacterState>>>;

#[derive(Default)]
struct CacheEntry {
    /// `None` only until the first successful fetch.
    value: Option<Arc<CharacterState>>,
    fetched_at: Option<Instant>,
}

/// Invariant: `waiters` is empty whenever `in_flight` is false.
#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: VecDeque<Waiter>,
    last_fetch_start: Option<Instant>,
}

#[derive(Default)]
struct CacheState {
    entry: CacheEntry,
    refresh: RefreshState,
}

struct Inner {
    api: Arc<dyn GameApi>,
    throttling: ThrottlingConfig,
    state: Mutex<CacheState>,
    counters: CacheCounters,
}

enum Plan {
    Ready(Option<Arc<CharacterState>>),
    Wait(oneshot::Receiver<Option<Arc<CharacterState>>>),
    Fetch,
}

/// Throttled, coalescing cache in front of [`GameApi::character_updates`].
#[derive(Clone)]
pub struct CharacterCache {
    inner: Arc<Inner>,
}

impl CharacterCache {
    pub fn new(api: Arc<dyn GameApi>, throttling: ThrottlingConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                throttling,
                state: Mutex::new(CacheState::default()),
                counters: CacheCounters::default(),
            }),
        }
    }

    /// Current character state.
    ///
    /// Returns `None` when no value could be obtained; callers treat that as
    /// "unavailable this tick".
    pub async fn get(&self, force: bool) -> Option<Arc<CharacterState>> {
        let plan = self.plan(force);
        match plan {
            Plan::Ready(value) => value,
            // A dropped sender means the refresh was abandoned
            Plan::Wait(rx) => rx.await.unwrap_or(None),
            Plan::Fetch => {
                // The fetch runs detached so a cancelled caller cannot leave
                // the refresh marked in flight.
                let inner = self.inner.clone();
                match tokio::spawn(async move { inner.refresh().await }).await {
                    Ok(value) => value,
                    Err(e) => {
                        error!("Character refresh task failed: {}", e);
                        self.inner.abandon_refresh();
                        None
                    }
                }
            }
        }
    }

    /// Last successfully fetched value, without touching the network.
    pub fn cached(&self) -> Option<Arc<CharacterState>> {
        self.inner.state.lock().entry.value.clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.state.lock().refresh.in_flight
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    fn plan(&self, force: bool) -> Plan {
        let throttling = &self.inner.throttling;
        let mut state = self.inner.state.lock();
        let now = Instant::now();

        if !force {
            if let (Some(value), Some(at)) = (&state.entry.value, state.entry.fetched_at) {
                if now.duration_since(at) < throttling.cache_expiry() {
                    self.inner.counters.record_hit();
                    return Plan::Ready(Some(value.clone()));
                }
            }
        }

        if state.refresh.in_flight {
            if state.refresh.waiters.len() >= throttling.max_queue_size {
                warn!("API queue full - dropping request");
                self.inner.counters.record_dropped();
                return Plan::Ready(state.entry.value.clone());
            }
            let (tx, rx) = oneshot::channel();
            state.refresh.waiters.push_back(tx);
            self.inner.counters.record_coalesced();
            debug!(
                "Queued behind in-flight refresh ({} waiting)",
                state.refresh.waiters.len()
            );
            return Plan::Wait(rx);
        }

        let cooling = state
            .refresh
            .last_fetch_start
            .is_some_and(|start| now.duration_since(start) < throttling.cooldown());
        if cooling {
            if let Some(value) = &state.entry.value {
                self.inner.counters.record_hit();
                return Plan::Ready(Some(value.clone()));
            }
        }

        state.refresh.in_flight = true;
        state.refresh.last_fetch_start = Some(now);
        Plan::Fetch
    }
}

impl Inner {
    async fn refresh(&self) -> Option<Arc<CharacterState>> {
        self.counters.record_fetch();
        let value = match self.api.character_updates().await {
            Ok(state) => Some(Arc::new(state)),
            Err(e) => {
                warn!("Character update failed: {}", e);
                self.counters.record_failure();
                None
            }
        };

        let waiters = {
            let mut state = self.state.lock();
            if let Some(value) = &value {
                state.entry.value = Some(value.clone());
                state.entry.fetched_at = Some(Instant::now());
            }
            state.refresh.in_flight = false;
            std::mem::take(&mut state.refresh.waiters)
        };

        for waiter in waiters {
            let _ = waiter.send(value.clone());
        }
        value
    }

    fn abandon_refresh(&self) {
        let waiters = {
            let mut state = self.state.lock();
            state.refresh.in_flight = false;
            std::mem::take(&mut state.refresh.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(None);
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
