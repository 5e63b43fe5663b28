//! Auto-trainer loop.
//!
//! Trains the selected stat every `interval_minutes` when the character has
//! at least `min_energy`. A failed training call moves the next attempt to
//! `retry_after` instead of the normal interval.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use racketeer_gateway::CharacterCache;
use racketeer_protocols::{GameApi, SettingsProvider, TrainOutcome, TrainingStat};
use racketeer_runloop::{LoopHandle, TimerService};

use crate::error::AutomationError;
use crate::status::{LoopKind, LoopStatus, StatusLine, amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Skipped,
    Trained,
    Failed,
}

struct TrainerState {
    handle: LoopHandle,
    /// Period of the armed repeating timer.
    armed_interval: Option<Duration>,
}

pub struct AutoTrainer {
    cache: CharacterCache,
    api: Arc<dyn GameApi>,
    settings: Arc<dyn SettingsProvider>,
    timers: Arc<TimerService>,
    retry_after: Duration,
    state: Mutex<TrainerState>,
    last_energy: Mutex<f64>,
    status: StatusLine,
}

impl AutoTrainer {
    pub fn new(
        cache: CharacterCache,
        api: Arc<dyn GameApi>,
        settings: Arc<dyn SettingsProvider>,
        timers: Arc<TimerService>,
        retry_after: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            cache,
            api,
            settings,
            timers,
            retry_after,
            state: Mutex::new(TrainerState {
                handle: LoopHandle::new(),
                armed_interval: None,
            }),
            last_energy: Mutex::new(0.0),
            status: StatusLine::new(LoopKind::Trainer),
        })
    }

    /// Enable the trainer: check now, then every `interval_minutes`.
    pub async fn start(self: &Arc<Self>) -> bool {
        let Some(generation) = self.state.lock().handle.activate() else {
            return false;
        };
        self.status.info("Auto-trainer activated");

        let outcome = self.check(generation).await;
        self.after_check(generation, outcome);

        let mut state = self.state.lock();
        if state.handle.is_current(generation) && !state.handle.has_timer() {
            let interval = self.interval();
            self.arm(&mut state, generation, interval, interval);
            state.handle.schedule_next(interval);
        }
        true
    }

    /// Disable the trainer and clear the next run.
    pub fn stop(&self) -> bool {
        {
            let mut state = self.state.lock();
            if !state.handle.deactivate() {
                return false;
            }
            state.armed_interval = None;
        }
        self.status.info("Auto-trainer deactivated");
        true
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().handle.is_enabled()
    }

    /// Energy seen on the latest character refresh.
    pub fn last_energy(&self) -> f64 {
        *self.last_energy.lock()
    }

    pub fn status(&self) -> LoopStatus {
        let state = self.state.lock();
        let phase = if state.handle.is_enabled() { "ACTIVE" } else { "INACTIVE" };
        LoopStatus::new(LoopKind::Trainer, state.handle.snapshot(), phase, &self.status)
    }

    pub fn last_message(&self) -> Option<String> {
        self.status.last_text()
    }

    /// Train once now, outside the schedule.
    ///
    /// Uses the configured stat when `stat` is `None`. When the loop is
    /// running, a successful call also moves its last/next run times.
    pub async fn manual_train(
        &self,
        stat: Option<TrainingStat>,
    ) -> Result<TrainOutcome, AutomationError> {
        let settings = self.settings.settings();
        let stat = stat.unwrap_or(settings.train_stat);

        let Some(character) = self.cache.get(true).await else {
            self.status.warn(AutomationError::Unavailable.to_string());
            return Err(AutomationError::Unavailable);
        };

        let energy = character.energy().unwrap_or(0.0);
        *self.last_energy.lock() = energy;
        if energy < f64::from(settings.min_energy) {
            let err = AutomationError::NotEnoughEnergy {
                current: amount(energy),
                required: settings.min_energy,
            };
            self.status.warn(err.to_string());
            return Err(err);
        }

        self.status.info(format!("Manually training {}...", stat));
        match self.api.train(stat).await {
            Ok(outcome) => {
                self.status.info(outcome.summary(stat));
                let mut state = self.state.lock();
                if state.handle.is_enabled() {
                    state.handle.record_run(self.interval());
                }
                Ok(outcome)
            }
            Err(e) => {
                let err = AutomationError::Training(e);
                self.status.warn(err.to_string());
                Err(err)
            }
        }
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.settings.settings().train_interval_minutes * 60)
    }

    fn arm(
        self: &Arc<Self>,
        state: &mut TrainerState,
        generation: u64,
        first_in: Duration,
        interval: Duration,
    ) {
        let this = self.clone();
        let timer = self
            .timers
            .repeating_after("auto-trainer", first_in, interval, move || {
                let this = this.clone();
                async move { this.tick(generation).await }
            });
        state.handle.replace_timer(timer);
        state.armed_interval = Some(interval);
    }

    async fn tick(self: &Arc<Self>, generation: u64) {
        if !self.state.lock().handle.is_current(generation) {
            return;
        }
        let outcome = self.check(generation).await;
        self.after_check(generation, outcome);
    }

    fn after_check(self: &Arc<Self>, generation: u64, outcome: TickOutcome) {
        let interval = self.interval();
        let mut state = self.state.lock();
        if !state.handle.is_current(generation) {
            return;
        }
        match outcome {
            TickOutcome::Failed => {
                state.handle.record_run(self.retry_after);
                self.arm(&mut state, generation, self.retry_after, interval);
            }
            TickOutcome::Trained => {
                state.handle.record_run(interval);
                // Pick up an interval edited since the timer was armed
                if state.armed_interval.is_some_and(|armed| armed != interval) {
                    self.arm(&mut state, generation, interval, interval);
                }
            }
            TickOutcome::Skipped => {
                if state.armed_interval.is_some_and(|armed| armed != interval) {
                    self.arm(&mut state, generation, interval, interval);
                    state.handle.schedule_next(interval);
                }
            }
        }
    }

    async fn check(&self, generation: u64) -> TickOutcome {
        let Some(character) = self.cache.get(true).await else {
            self.status.warn("Failed to fetch character updates");
            return TickOutcome::Skipped;
        };
        if !self.state.lock().handle.is_current(generation) {
            return TickOutcome::Skipped;
        }

        let settings = self.settings.settings();
        let energy = character.energy().unwrap_or(0.0);
        *self.last_energy.lock() = energy;

        if energy < f64::from(settings.min_energy) {
            self.status.info(format!(
                "Waiting for energy ({}/{})",
                amount(energy),
                settings.min_energy
            ));
            return TickOutcome::Skipped;
        }

        let stat = settings.train_stat;
        self.status.info(format!("Training {}...", stat));
        match self.api.train(stat).await {
            Ok(outcome) => {
                self.status.info(outcome.summary(stat));
                TickOutcome::Trained
            }
            Err(e) => {
                self.status.warn(format!("Training failed: {}", e));
                TickOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "trainer_tests.rs"]
mod tests;
