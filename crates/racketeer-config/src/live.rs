//! Live settings store.
//!
//! Holds the parameters a user may edit while the loops run. Every setter
//! clamps to the same ranges the validator enforces on the file.

use std::ops::RangeInclusive;

use parking_lot::RwLock;

use racketeer_protocols::{ActionKind, AutomationSettings, SettingsProvider, TrainingStat};

use crate::schema::Config;

pub const SCAN_INTERVAL_RANGE_MS: RangeInclusive<u64> = 50..=1000;
pub const TRAIN_INTERVAL_RANGE_MINUTES: RangeInclusive<u64> = 1..=60;
pub const MIN_ENERGY_RANGE: RangeInclusive<u32> = 1..=100;

/// Thread-safe store of the current automation parameters.
#[derive(Debug, Default)]
pub struct LiveSettings {
    inner: RwLock<AutomationSettings>,
}

impl LiveSettings {
    pub fn new(initial: AutomationSettings) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.automation_settings())
    }

    pub fn scan_interval_ms(&self) -> u64 {
        self.inner.read().scan_interval_ms
    }

    /// Set the scan interval, clamped to 50..=1000 ms. Returns the stored value.
    pub fn set_scan_interval_ms(&self, ms: u64) -> u64 {
        let clamped = ms.clamp(*SCAN_INTERVAL_RANGE_MS.start(), *SCAN_INTERVAL_RANGE_MS.end());
        self.inner.write().scan_interval_ms = clamped;
        clamped
    }

    pub fn set_train_interval_minutes(&self, minutes: u64) -> u64 {
        let clamped = minutes.clamp(
            *TRAIN_INTERVAL_RANGE_MINUTES.start(),
            *TRAIN_INTERVAL_RANGE_MINUTES.end(),
        );
        self.inner.write().train_interval_minutes = clamped;
        clamped
    }

    pub fn set_min_energy(&self, energy: u32) -> u32 {
        let clamped = energy.clamp(*MIN_ENERGY_RANGE.start(), *MIN_ENERGY_RANGE.end());
        self.inner.write().min_energy = clamped;
        clamped
    }

    pub fn set_train_stat(&self, stat: TrainingStat) {
        self.inner.write().train_stat = stat;
    }

    pub fn set_action_id(&self, kind: ActionKind, id: Option<u64>) {
        self.inner.write().set_action_id(kind, id);
    }

    pub fn resource_cost(&self, kind: ActionKind) -> u32 {
        self.inner.read().costs.threshold(kind)
    }

    /// Set a resource threshold; negative inputs store zero.
    pub fn set_resource_cost(&self, kind: ActionKind, value: i64) -> u32 {
        let stored = value.clamp(0, i64::from(u32::MAX)) as u32;
        self.inner.write().costs.set_threshold(kind, stored);
        stored
    }
}

impl SettingsProvider for LiveSettings {
    fn settings(&self) -> AutomationSettings {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_interval_is_clamped() {
        let live = LiveSettings::default();
        assert_eq!(live.set_scan_interval_ms(10), 50);
        assert_eq!(live.set_scan_interval_ms(5000), 1000);
        assert_eq!(live.set_scan_interval_ms(250), 250);
        assert_eq!(live.scan_interval_ms(), 250);
    }

    #[test]
    fn test_train_interval_and_energy_clamped() {
        let live = LiveSettings::default();
        assert_eq!(live.set_train_interval_minutes(0), 1);
        assert_eq!(live.set_train_interval_minutes(90), 60);
        assert_eq!(live.set_min_energy(0), 1);
        assert_eq!(live.set_min_energy(150), 100);
    }

    #[test]
    fn test_negative_resource_cost_stores_zero() {
        let live = LiveSettings::default();
        assert_eq!(live.set_resource_cost(ActionKind::Gta, -5), 0);
        assert_eq!(live.resource_cost(ActionKind::Gta), 0);
        assert_eq!(live.set_resource_cost(ActionKind::Heist, 25), 25);
        assert_eq!(live.resource_cost(ActionKind::Heist), 25);
    }

    #[test]
    fn test_settings_snapshot_reflects_edits() {
        let live = LiveSettings::from_config(&Config::default());
        live.set_train_stat(TrainingStat::Endurance);
        live.set_action_id(ActionKind::Crime, Some(9));

        let snapshot = live.settings();
        assert_eq!(snapshot.train_stat, TrainingStat::Endurance);
        assert_eq!(snapshot.crime_id, Some(9));
    }
}
