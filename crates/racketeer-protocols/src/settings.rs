//! Live automation parameters read by the loops on every tick.

use serde::{Deserialize, Serialize};

use crate::game::{ActionKind, TrainingStat};

/// Minimum resource level required before an action is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCosts {
    pub crime_nerve: u32,
    pub gta_focus: u32,
    pub heist_wit: u32,
}

impl ResourceCosts {
    pub fn threshold(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Crime => self.crime_nerve,
            ActionKind::Gta => self.gta_focus,
            ActionKind::Heist => self.heist_wit,
        }
    }

    pub fn set_threshold(&mut self, kind: ActionKind, value: u32) {
        match kind {
            ActionKind::Crime => self.crime_nerve = value,
            ActionKind::Gta => self.gta_focus = value,
            ActionKind::Heist => self.heist_wit = value,
        }
    }
}

impl Default for ResourceCosts {
    fn default() -> Self {
        Self {
            crime_nerve: 10,
            gta_focus: 15,
            heist_wit: 20,
        }
    }
}

/// Snapshot of the user-editable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSettings {
    pub scan_interval_ms: u64,
    pub train_interval_minutes: u64,
    pub min_energy: u32,
    pub train_stat: TrainingStat,
    /// Explicit action ids; `None` means "field left empty".
    pub crime_id: Option<u64>,
    pub gta_id: Option<u64>,
    pub heist_id: Option<u64>,
    pub costs: ResourceCosts,
}

impl AutomationSettings {
    pub fn action_id(&self, kind: ActionKind) -> Option<u64> {
        match kind {
            ActionKind::Crime => self.crime_id,
            ActionKind::Gta => self.gta_id,
            ActionKind::Heist => self.heist_id,
        }
    }

    pub fn set_action_id(&mut self, kind: ActionKind, id: Option<u64>) {
        match kind {
            ActionKind::Crime => self.crime_id = id,
            ActionKind::Gta => self.gta_id = id,
            ActionKind::Heist => self.heist_id = id,
        }
    }
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            scan_interval_ms: 100,
            train_interval_minutes: 1,
            min_energy: 10,
            train_stat: TrainingStat::default(),
            crime_id: None,
            gta_id: None,
            heist_id: None,
            costs: ResourceCosts::default(),
        }
    }
}

/// Source of live settings.
///
/// Loops call this at the moment an iteration needs a value, so edits made
/// between ticks take effect on the next tick.
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> AutomationSettings;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_costs() {
        let costs = ResourceCosts::default();
        assert_eq!(costs.threshold(ActionKind::Crime), 10);
        assert_eq!(costs.threshold(ActionKind::Gta), 15);
        assert_eq!(costs.threshold(ActionKind::Heist), 20);
    }

    #[test]
    fn test_set_threshold() {
        let mut costs = ResourceCosts::default();
        costs.set_threshold(ActionKind::Heist, 35);
        assert_eq!(costs.heist_wit, 35);
        assert_eq!(costs.crime_nerve, 10);
    }

    #[test]
    fn test_action_ids() {
        let mut settings = AutomationSettings::default();
        assert_eq!(settings.action_id(ActionKind::Gta), None);
        settings.set_action_id(ActionKind::Gta, Some(4));
        assert_eq!(settings.action_id(ActionKind::Gta), Some(4));
        assert_eq!(settings.action_id(ActionKind::Crime), None);
    }
}
