//! In-memory game used by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use racketeer_protocols::{
    ActionKind, ActionOutcome, ApiError, CharacterState, GameApi, TrainOutcome, TrainingStat,
};

pub fn character(energy: f64, nerve: f64, focus: f64, wit: f64) -> Value {
    json!({
        "resources": {
            "energy": { "current": energy.to_string() },
            "nerve": { "current": nerve.to_string() },
            "focus": { "current": focus.to_string() },
            "wit": { "current": wit.to_string() }
        },
        "jail": { "isInJail": false },
        "timers": { "crime": true, "gta": true }
    })
}

pub struct FakeGame {
    pub state: Mutex<Value>,
    pub fail_updates: AtomicBool,
    pub updates: AtomicU32,
    pub trained: Mutex<Vec<TrainingStat>>,
    pub performed: Mutex<Vec<(ActionKind, u64)>>,
    pub train_result: Mutex<Result<Value, ApiError>>,
    pub action_result: Mutex<Result<Value, ApiError>>,
    pub action_delay: Mutex<Duration>,
}

impl FakeGame {
    pub fn new(state: Value) -> Self {
        Self {
            state: Mutex::new(state),
            fail_updates: AtomicBool::new(false),
            updates: AtomicU32::new(0),
            trained: Mutex::new(Vec::new()),
            performed: Mutex::new(Vec::new()),
            train_result: Mutex::new(Ok(json!({ "energy_cost": 10, "exp_gained": 3 }))),
            action_result: Mutex::new(Ok(json!({ "reward": 100, "exp_gained": 2 }))),
            action_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn set_state(&self, state: Value) {
        *self.state.lock() = state;
    }

    pub fn updates(&self) -> u32 {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn performed(&self) -> Vec<(ActionKind, u64)> {
        self.performed.lock().clone()
    }
}

#[async_trait]
impl GameApi for FakeGame {
    async fn character_updates(&self) -> Result<CharacterState, ApiError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(CharacterState::new(self.state.lock().clone()))
    }

    async fn train(&self, stat: TrainingStat) -> Result<TrainOutcome, ApiError> {
        self.trained.lock().push(stat);
        self.train_result.lock().clone().map(TrainOutcome::from_value)
    }

    async fn perform(&self, kind: ActionKind, id: u64) -> Result<ActionOutcome, ApiError> {
        self.performed.lock().push((kind, id));
        let delay = *self.action_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.action_result.lock().clone().map(ActionOutcome::from_value)
    }
}
