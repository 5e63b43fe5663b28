//! Randomized intervals.

use std::time::Duration;

use rand::Rng;

/// `base_ms` shifted by a uniform offset in `[-variance_ms, +variance_ms)`.
///
/// Never returns less than one millisecond.
pub fn randomize(base_ms: u64, variance_ms: u64) -> Duration {
    if variance_ms == 0 {
        return Duration::from_millis(base_ms.max(1));
    }
    let offset = rand::rng().random_range(0..variance_ms * 2) as i64 - variance_ms as i64;
    let ms = (base_ms as i64 + offset).max(1);
    Duration::from_millis(ms as u64)
}
