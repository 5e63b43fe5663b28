//! Auto-crime loop and the shared action attempt.
//!
//! Every tick force-refreshes the character, skips while jailed, then tries
//! at most one action in priority order: heist, GTA, crime. Attempts go
//! through an [`ActionGate`], which also serves the manual entry points.

use std::sync::Arc;

use parking_lot::Mutex;

use racketeer_config::CrimesConfig;
use racketeer_gateway::CharacterCache;
use racketeer_protocols::{
    ActionKind, ActionOutcome, CharacterState, GameApi, ResourceCosts, SettingsProvider,
};
use racketeer_runloop::{LoopHandle, TimerService};

use crate::cooldown::{ActionGate, GateRefusal, GateState};
use crate::error::AutomationError;
use crate::status::{LoopKind, LoopStatus, StatusLine, amount};

pub struct AutoCrime {
    cache: CharacterCache,
    api: Arc<dyn GameApi>,
    settings: Arc<dyn SettingsProvider>,
    timers: Arc<TimerService>,
    config: CrimesConfig,
    handle: Mutex<LoopHandle>,
    gate: Arc<ActionGate>,
    status: StatusLine,
}

impl AutoCrime {
    pub fn new(
        cache: CharacterCache,
        api: Arc<dyn GameApi>,
        settings: Arc<dyn SettingsProvider>,
        timers: Arc<TimerService>,
        config: CrimesConfig,
    ) -> Arc<Self> {
        let gate = ActionGate::new(timers.clone());
        Arc::new(Self {
            cache,
            api,
            settings,
            timers,
            config,
            handle: Mutex::new(LoopHandle::new()),
            gate,
            status: StatusLine::new(LoopKind::Crimes),
        })
    }

    /// Enable the loop: run one check now, then every `interval_ms`.
    pub async fn start(self: &Arc<Self>) -> bool {
        let Some(generation) = self.handle.lock().activate() else {
            return false;
        };
        self.status.info("Auto-crime system activated");

        self.tick(generation).await;

        let mut handle = self.handle.lock();
        if handle.is_current(generation) && !handle.has_timer() {
            let this = self.clone();
            let timer = self
                .timers
                .repeating("auto-crime", self.config.interval(), move || {
                    let this = this.clone();
                    async move { this.tick(generation).await }
                });
            handle.replace_timer(timer);
            handle.schedule_next(self.config.interval());
        }
        true
    }

    /// Disable the loop. A running cooldown is left to expire on its own.
    pub fn stop(&self) -> bool {
        if !self.handle.lock().deactivate() {
            return false;
        }
        self.status.info("Auto-crime system deactivated");
        true
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().is_enabled()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn status(&self) -> LoopStatus {
        let phase = match self.gate.state() {
            GateState::Ready => "Ready".to_string(),
            GateState::Attempting => "Attempting".to_string(),
            GateState::Cooling { remaining } => format!("Cooldown: {}s", remaining),
        };
        LoopStatus::new(
            LoopKind::Crimes,
            self.handle.lock().snapshot(),
            phase,
            &self.status,
        )
    }

    pub fn last_message(&self) -> Option<String> {
        self.status.last_text()
    }

    async fn tick(self: &Arc<Self>, generation: u64) {
        if !self.handle.lock().is_current(generation) {
            self.status.info("Auto-crime system inactive");
            return;
        }

        let state = match self.cache.get(true).await {
            Some(state) if state.has_resources() => state,
            _ => {
                self.status.warn("Failed to fetch character updates");
                return;
            }
        };

        {
            let mut handle = self.handle.lock();
            if !handle.is_current(generation) {
                return;
            }
            handle.record_run(self.config.interval());
        }

        if state.in_jail() {
            self.status.info("Character is in jail - skipping");
            return;
        }

        let costs = self.settings.settings().costs;
        let (nerve, focus, wit) = levels(&state);

        match choose_action(&state, &costs) {
            Some(kind) => {
                let announce = match kind {
                    ActionKind::Heist => format!("Auto-starting heist (Wit: {})", amount(wit)),
                    ActionKind::Gta => format!("Auto-committing GTA (Focus: {})", amount(focus)),
                    ActionKind::Crime => {
                        format!("Auto-committing crime (Nerve: {})", amount(nerve))
                    }
                };
                self.status.info(announce);
                // Outcome is already reported on the status line
                let _ = self.execute(kind).await;
            }
            None => {
                self.status.info(format!(
                    "Insufficient resources (Nerve:{} Focus:{} Wit:{})",
                    amount(nerve),
                    amount(focus),
                    amount(wit)
                ));
            }
        }
    }

    /// Attempt one action: cooldown gate, forced refresh, jail check, call.
    pub async fn execute(
        self: &Arc<Self>,
        kind: ActionKind,
    ) -> Result<ActionOutcome, AutomationError> {
        let permit = match self.gate.try_acquire() {
            Ok(permit) => permit,
            Err(refusal) => {
                let err = match refusal {
                    GateRefusal::Cooling(remaining) => AutomationError::CoolingDown(remaining),
                    GateRefusal::Busy => AutomationError::Busy,
                };
                self.status.warn(err.to_string());
                return Err(err);
            }
        };

        let Some(state) = self.cache.get(true).await else {
            self.status.warn("Failed to fetch character data");
            permit.cooldown(self.config.default_cooldown_secs);
            return Err(AutomationError::Unavailable);
        };

        if state.in_jail() {
            self.status.warn(AutomationError::InJail.to_string());
            return Err(AutomationError::InJail);
        }

        let id = self
            .settings
            .settings()
            .action_id(kind)
            .unwrap_or_else(|| self.default_id(kind));

        self.status.info(format!("Attempting {}...", kind));
        match self.api.perform(kind, id).await {
            Ok(outcome) => {
                self.status.info(outcome.summary(kind));
                permit.cooldown(outcome.cooldown_remaining.unwrap_or(0));
                Ok(outcome)
            }
            Err(source) => {
                let err = AutomationError::Action { kind, source };
                self.status.warn(err.to_string());
                permit.cooldown(self.config.default_cooldown_secs);
                Err(err)
            }
        }
    }

    fn default_id(&self, kind: ActionKind) -> u64 {
        match kind {
            ActionKind::Crime => self.config.default_crime_id,
            ActionKind::Gta => self.config.default_gta_id,
            ActionKind::Heist => self.config.default_heist_id,
        }
    }
}

/// Levels for the status line; a missing resource shows as zero.
fn levels(state: &CharacterState) -> (f64, f64, f64) {
    (
        state.nerve().unwrap_or(0.0),
        state.focus().unwrap_or(0.0),
        state.wit().unwrap_or(0.0),
    )
}

/// First action in priority order whose conditions hold.
///
/// Heists only need wit; GTA and crime also need their availability timer.
/// A resource missing from the character never meets its threshold.
pub fn choose_action(state: &CharacterState, costs: &ResourceCosts) -> Option<ActionKind> {
    ActionKind::PRIORITY.into_iter().find(|kind| {
        let threshold = f64::from(costs.threshold(*kind));
        let affordable = state
            .resource(kind.resource())
            .is_some_and(|level| level >= threshold);
        affordable
            && match kind {
                ActionKind::Heist => true,
                ActionKind::Gta => state.gta_ready(),
                ActionKind::Crime => state.crime_ready(),
            }
    })
}

#[cfg(test)]
#[path = "crime_tests.rs"]
mod tests;
