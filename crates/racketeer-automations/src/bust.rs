//! Bust scanner.
//!
//! `Stopped -> Scanning -> (match: Clicking -> Paused -> Scanning) | (no match: Scanning)`
//!
//! Scans run on a jittered repeating timer. After a click the repeating timer
//! is cancelled and a one-shot pause timer takes its slot; when the pause
//! expires a fresh jittered timer is armed, provided the run that scheduled
//! the pause is still the current one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use racketeer_config::BustConfig;
use racketeer_protocols::{DomProbe, ElementInfo, SettingsProvider};
use racketeer_runloop::{LoopHandle, TimerService, randomize};

use crate::status::{LoopKind, LoopStatus, StatusLine, seconds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BustPhase {
    Stopped,
    Scanning,
    Clicking,
    Paused,
}

impl fmt::Display for BustPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BustPhase::Stopped => "Stopped",
            BustPhase::Scanning => "Scanning",
            BustPhase::Clicking => "Clicking",
            BustPhase::Paused => "Paused",
        };
        f.write_str(label)
    }
}

struct BustState {
    handle: LoopHandle,
    phase: BustPhase,
}

pub struct BustScanner {
    probe: Arc<dyn DomProbe>,
    settings: Arc<dyn SettingsProvider>,
    timers: Arc<TimerService>,
    config: BustConfig,
    lexicon: Vec<String>,
    state: Mutex<BustState>,
    scanning: AtomicBool,
    clicks: AtomicU64,
    status: StatusLine,
}

impl BustScanner {
    pub fn new(
        probe: Arc<dyn DomProbe>,
        settings: Arc<dyn SettingsProvider>,
        timers: Arc<TimerService>,
        config: BustConfig,
    ) -> Arc<Self> {
        let lexicon = config
            .lexicon
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Arc::new(Self {
            probe,
            settings,
            timers,
            config,
            lexicon,
            state: Mutex::new(BustState {
                handle: LoopHandle::new(),
                phase: BustPhase::Stopped,
            }),
            scanning: AtomicBool::new(false),
            clicks: AtomicU64::new(0),
            status: StatusLine::new(LoopKind::Bust),
        })
    }

    /// Enable the scanner: scan once right away, then on a jittered timer.
    ///
    /// Returns false if the scanner was already running.
    pub async fn start(self: &Arc<Self>) -> bool {
        let generation = {
            let mut state = self.state.lock();
            let Some(generation) = state.handle.activate() else {
                return false;
            };
            state.phase = BustPhase::Scanning;
            generation
        };
        self.status.info("Bust scanner activated");

        self.run_scan(generation).await;

        let mut state = self.state.lock();
        // The first scan may already have clicked and installed a pause timer
        if state.handle.is_current(generation) && !state.handle.has_timer() {
            let interval = self.arm(&mut state.handle, generation);
            drop(state);
            self.status.info(format!(
                "Starting scan (randomized interval: ~{}s)",
                seconds(interval)
            ));
        }
        true
    }

    /// Disable the scanner. Stopping a stopped scanner is a no-op.
    pub fn stop(&self) -> bool {
        {
            let mut state = self.state.lock();
            if !state.handle.deactivate() {
                return false;
            }
            state.phase = BustPhase::Stopped;
        }
        self.status.info("Bust scanner deactivated");
        true
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().handle.is_enabled()
    }

    pub fn phase(&self) -> BustPhase {
        self.state.lock().phase
    }

    pub fn clicks(&self) -> u64 {
        self.clicks.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> LoopStatus {
        let state = self.state.lock();
        LoopStatus::new(
            LoopKind::Bust,
            state.handle.snapshot(),
            state.phase.to_string(),
            &self.status,
        )
    }

    pub fn last_message(&self) -> Option<String> {
        self.status.last_text()
    }

    fn arm(self: &Arc<Self>, handle: &mut LoopHandle, generation: u64) -> Duration {
        let base = self.settings.settings().scan_interval_ms;
        let interval = randomize(base, self.config.jitter_ms);
        let this = self.clone();
        let timer = self.timers.repeating("bust-scan", interval, move || {
            let this = this.clone();
            async move { this.run_scan(generation).await }
        });
        handle.replace_timer(timer);
        interval
    }

    async fn run_scan(self: &Arc<Self>, generation: u64) {
        if !self.state.lock().handle.is_current(generation) {
            return;
        }
        if self.scanning.swap(true, Ordering::SeqCst) {
            debug!("Previous bust scan still running, skipping tick");
            return;
        }
        self.scan(generation).await;
        self.scanning.store(false, Ordering::SeqCst);
    }

    async fn scan(self: &Arc<Self>, generation: u64) {
        let elements = match self.probe.clickable_elements().await {
            Ok(elements) => elements,
            Err(e) => {
                self.status.warn(format!("Scan failed: {}", e));
                return;
            }
        };

        let matches: Vec<&ElementInfo> = elements
            .iter()
            .filter(|el| self.lexicon.contains(&el.normalized_text()))
            .collect();

        if matches.is_empty() {
            self.status
                .info("No matching buttons found (looking for: Bust, Self Bust)");
            return;
        }

        let listed: Vec<String> = matches
            .iter()
            .map(|el| format!("\"{}\"", el.text.trim()))
            .collect();
        self.status.info(format!(
            "Found {} matching buttons: {}",
            matches.len(),
            listed.join(", ")
        ));

        let Some(target) = pick_target(&matches, &self.config.preferred_classes) else {
            return;
        };

        {
            let mut state = self.state.lock();
            if !state.handle.is_current(generation) {
                return;
            }
            state.phase = BustPhase::Clicking;
        }
        self.status
            .info(format!("Clicking: \"{}\"", target.text.trim()));

        if let Err(e) = self.probe.click(target).await {
            self.status.warn(format!("Click failed: {}", e));
            let mut state = self.state.lock();
            if state.handle.is_current(generation) {
                state.phase = BustPhase::Scanning;
            }
            return;
        }
        self.clicks.fetch_add(1, Ordering::Relaxed);

        self.pause(generation);
    }

    fn pause(self: &Arc<Self>, generation: u64) {
        let delay = randomize(self.config.pause_ms, self.config.jitter_ms);
        {
            let mut state = self.state.lock();
            if !state.handle.is_current(generation) {
                return;
            }
            state.handle.clear_timer();
            state.phase = BustPhase::Paused;

            let this = self.clone();
            let timer = self
                .timers
                .once("bust-pause", delay, move || async move { this.resume(generation) });
            state.handle.replace_timer(timer);
        }
        self.status
            .info(format!("Pausing for {}s...", seconds(delay)));
    }

    fn resume(self: &Arc<Self>, generation: u64) {
        let interval = {
            let mut state = self.state.lock();
            if !state.handle.is_current(generation) {
                return;
            }
            state.phase = BustPhase::Scanning;
            self.arm(&mut state.handle, generation)
        };
        self.status.info(format!(
            "Resuming scan (next check in ~{}s)",
            seconds(interval)
        ));
    }
}

/// Prefer the first element carrying each preferred class in turn, then the
/// first match in document order.
pub fn pick_target<'a>(
    matches: &[&'a ElementInfo],
    preferred_classes: &[String],
) -> Option<&'a ElementInfo> {
    preferred_classes
        .iter()
        .find_map(|class| matches.iter().find(|el| el.has_class(class)).copied())
        .or_else(|| matches.first().copied())
}

#[cfg(test)]
#[path = "bust_tests.rs"]
mod tests;
