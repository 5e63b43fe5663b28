//! Per-loop status reporting.
//!
//! Each loop keeps its latest human-readable message (the "results area")
//! and mirrors every message to tracing with an `automation` field.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};

use racketeer_runloop::LoopSnapshot;

/// The three automation loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Bust,
    Trainer,
    Crimes,
}

impl LoopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopKind::Bust => "bust",
            LoopKind::Trainer => "trainer",
            LoopKind::Crimes => "crimes",
        }
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: DateTime<Utc>,
}

/// Latest message of one loop.
#[derive(Debug)]
pub struct StatusLine {
    kind: LoopKind,
    last: RwLock<Option<StatusMessage>>,
}

impl StatusLine {
    pub fn new(kind: LoopKind) -> Self {
        Self {
            kind,
            last: RwLock::new(None),
        }
    }

    pub fn info(&self, text: impl Into<String>) {
        let text = text.into();
        info!(automation = %self.kind, "{}", text);
        self.store(text, false);
    }

    pub fn warn(&self, text: impl Into<String>) {
        let text = text.into();
        warn!(automation = %self.kind, "{}", text);
        self.store(text, true);
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.last.read().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.last.read().as_ref().map(|m| m.text.clone())
    }

    fn store(&self, text: String, is_error: bool) {
        *self.last.write() = Some(StatusMessage {
            text,
            is_error,
            at: Utc::now(),
        });
    }
}

/// Answer to a per-loop status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopStatus {
    pub kind: LoopKind,
    pub enabled: bool,
    /// Loop-specific state label, e.g. `Scanning` or `Cooling (4s)`.
    pub phase: String,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub message: Option<StatusMessage>,
}

impl LoopStatus {
    pub(crate) fn new(
        kind: LoopKind,
        snapshot: LoopSnapshot,
        phase: impl Into<String>,
        line: &StatusLine,
    ) -> Self {
        Self {
            kind,
            enabled: snapshot.enabled,
            phase: phase.into(),
            last_run: snapshot.last_run,
            next_run: snapshot.next_run,
            message: line.last(),
        }
    }

    /// `ACTIVE` or `INACTIVE`.
    pub fn label(&self) -> &'static str {
        if self.enabled { "ACTIVE" } else { "INACTIVE" }
    }
}

/// Render a resource amount the way the game shows it (`42`, `7.5`).
pub(crate) fn amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Seconds with at most two decimals (`0.31`).
pub(crate) fn seconds(duration: std::time::Duration) -> String {
    let secs = (duration.as_millis() as f64 / 10.0).round() / 100.0;
    amount(secs)
}
