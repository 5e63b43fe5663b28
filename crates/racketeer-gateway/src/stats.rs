//! Character cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated by the cache.
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    fetches: AtomicU64,
    failures: AtomicU64,
    hits: AtomicU64,
    coalesced: AtomicU64,
    dropped: AtomicU64,
}

impl CacheCounters {
    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            fetches: self.fetches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests that reached the gateway.
    pub fetches: u64,
    /// Fetches that came back with an error.
    pub failures: u64,
    /// Calls answered from the cache (fresh, or inside the cooldown).
    pub hits: u64,
    /// Calls that waited on another caller's fetch.
    pub coalesced: u64,
    /// Calls turned away because the wait queue was full.
    pub dropped: u64,
}
