//! Programmatic control surface over the three loops.

use std::sync::Arc;

use tracing::{info, warn};

use racketeer_config::{Config, LiveSettings};
use racketeer_gateway::{CacheStats, CharacterCache};
use racketeer_protocols::{
    ActionKind, ActionOutcome, AutomationSettings, CharacterState, DomProbe, GameApi,
    SettingsProvider, TrainOutcome, TrainingStat,
};
use racketeer_runloop::{TimerService, TimerUsage};

use crate::bust::BustScanner;
use crate::crime::AutoCrime;
use crate::error::AutomationError;
use crate::status::{LoopKind, LoopStatus};
use crate::trainer::AutoTrainer;

/// Owns the shared cache, settings and timers, and the three loops built on
/// top of them.
pub struct Autopilot {
    config: Config,
    settings: Arc<LiveSettings>,
    timers: Arc<TimerService>,
    cache: CharacterCache,
    probe: Arc<dyn DomProbe>,
    bust: Arc<BustScanner>,
    trainer: Arc<AutoTrainer>,
    crimes: Arc<AutoCrime>,
}

impl Autopilot {
    pub fn new(config: Config, api: Arc<dyn GameApi>, probe: Arc<dyn DomProbe>) -> Self {
        let settings = Arc::new(LiveSettings::from_config(&config));
        let timers = Arc::new(TimerService::new());
        let cache = CharacterCache::new(api.clone(), config.throttling.clone());

        let provider: Arc<dyn SettingsProvider> = settings.clone();
        let bust = BustScanner::new(
            probe.clone(),
            provider.clone(),
            timers.clone(),
            config.bust.clone(),
        );
        let trainer = AutoTrainer::new(
            cache.clone(),
            api.clone(),
            provider.clone(),
            timers.clone(),
            config.trainer.retry_after(),
        );
        let crimes = AutoCrime::new(
            cache.clone(),
            api,
            provider,
            timers.clone(),
            config.crimes.clone(),
        );

        Self {
            config,
            settings,
            timers,
            cache,
            probe,
            bust,
            trainer,
            crimes,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start one loop. Returns false if it was already running.
    pub async fn start(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Bust => self.bust.start().await,
            LoopKind::Trainer => self.trainer.start().await,
            LoopKind::Crimes => self.crimes.start().await,
        }
    }

    /// Stop one loop. Returns false if it was already stopped.
    pub fn stop(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Bust => self.bust.stop(),
            LoopKind::Trainer => self.trainer.stop(),
            LoopKind::Crimes => self.crimes.stop(),
        }
    }

    pub fn is_running(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Bust => self.bust.is_running(),
            LoopKind::Trainer => self.trainer.is_running(),
            LoopKind::Crimes => self.crimes.is_running(),
        }
    }

    pub fn status(&self, kind: LoopKind) -> LoopStatus {
        match kind {
            LoopKind::Bust => self.bust.status(),
            LoopKind::Trainer => self.trainer.status(),
            LoopKind::Crimes => self.crimes.status(),
        }
    }

    /// Start every loop switched on in the configuration.
    pub async fn start_enabled(&self) -> Vec<LoopKind> {
        let mut started = Vec::new();
        for (kind, enabled) in [
            (LoopKind::Bust, self.config.bust.enabled),
            (LoopKind::Trainer, self.config.trainer.enabled),
            (LoopKind::Crimes, self.config.crimes.enabled),
        ] {
            if enabled && self.start(kind).await {
                started.push(kind);
            }
        }
        started
    }

    pub fn scan_interval(&self) -> u64 {
        self.settings.scan_interval_ms()
    }

    /// Set the scan interval, clamped to 50..=1000 ms. A running scanner picks
    /// it up the next time it arms its timer.
    pub fn set_scan_interval(&self, ms: u64) -> u64 {
        self.settings.set_scan_interval_ms(ms)
    }

    pub fn resource_cost(&self, kind: ActionKind) -> u32 {
        self.settings.resource_cost(kind)
    }

    /// Set the threshold for `kind`. Negative values are stored as zero.
    pub fn set_resource_cost(&self, kind: ActionKind, value: i64) -> u32 {
        self.settings.set_resource_cost(kind, value)
    }

    pub fn settings(&self) -> AutomationSettings {
        self.settings.settings()
    }

    pub async fn character_updates(&self, force: bool) -> Option<Arc<CharacterState>> {
        self.cache.get(force).await
    }

    /// Energy seen by the trainer on its latest refresh.
    pub fn current_energy(&self) -> f64 {
        self.trainer.last_energy()
    }

    pub async fn manual_train(
        &self,
        stat: Option<TrainingStat>,
    ) -> Result<TrainOutcome, AutomationError> {
        self.trainer.manual_train(stat).await
    }

    pub async fn commit_crime(&self, id: Option<u64>) -> Result<ActionOutcome, AutomationError> {
        self.act(ActionKind::Crime, id).await
    }

    pub async fn commit_gta(&self, id: Option<u64>) -> Result<ActionOutcome, AutomationError> {
        self.act(ActionKind::Gta, id).await
    }

    pub async fn start_heist(&self, id: Option<u64>) -> Result<ActionOutcome, AutomationError> {
        self.act(ActionKind::Heist, id).await
    }

    /// Run one action attempt. A given id replaces the configured one.
    pub async fn act(
        &self,
        kind: ActionKind,
        id: Option<u64>,
    ) -> Result<ActionOutcome, AutomationError> {
        if let Some(id) = id {
            self.settings.set_action_id(kind, Some(id));
        }
        self.crimes.execute(kind).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn resource_usage(&self) -> TimerUsage {
        self.timers.usage()
    }

    /// Stop every loop, cancel every outstanding timer and undo the probe's
    /// page-side changes.
    pub async fn destroy(&self) {
        for kind in [LoopKind::Bust, LoopKind::Trainer, LoopKind::Crimes] {
            self.stop(kind);
        }
        let cancelled = self.timers.cancel_all();
        if let Err(e) = self.probe.release().await {
            warn!("Failed to release DOM probe: {}", e);
        }
        info!("Autopilot destroyed ({} timers cancelled)", cancelled);
    }
}
