//! Character state as returned by `GET /character-updates`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of the player's character.
///
/// The payload is kept as opaque JSON; only the handful of fields the
/// automations depend on get typed accessors. A snapshot is never mutated
/// after it is fetched, the cache replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterState(Value);

impl CharacterState {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Whether the payload carries a `resources` object at all.
    pub fn has_resources(&self) -> bool {
        self.0.get("resources").is_some_and(Value::is_object)
    }

    /// Current value of a resource such as `energy` or `nerve`.
    pub fn resource(&self, name: &str) -> Option<f64> {
        self.0
            .get("resources")
            .and_then(|r| r.get(name))
            .and_then(|r| r.get("current"))
            .and_then(lenient_number)
    }

    pub fn energy(&self) -> Option<f64> {
        self.resource("energy")
    }

    pub fn nerve(&self) -> Option<f64> {
        self.resource("nerve")
    }

    pub fn focus(&self) -> Option<f64> {
        self.resource("focus")
    }

    pub fn wit(&self) -> Option<f64> {
        self.resource("wit")
    }

    pub fn in_jail(&self) -> bool {
        self.0
            .get("jail")
            .and_then(|j| j.get("isInJail"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Availability flag under `timers.<name>`; only a literal `true` counts.
    pub fn timer_ready(&self, name: &str) -> bool {
        self.0
            .get("timers")
            .and_then(|t| t.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn crime_ready(&self) -> bool {
        self.timer_ready("crime")
    }

    pub fn gta_ready(&self) -> bool {
        self.timer_ready("gta")
    }
}

impl From<Value> for CharacterState {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}

/// Read a number that the server may send either as a JSON number or as a
/// numeric string. Leading numeric prefixes (`"12.5 pts"`) are accepted.
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_prefix(s),
        _ => None,
    }
}

fn parse_numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse::<f64>().ok()
}
