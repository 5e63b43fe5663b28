//! Game API trait and the action/training vocabulary shared by the loops.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::character::{CharacterState, lenient_number};
use crate::error::ApiError;

/// The remote game API as consumed by the automation loops.
///
/// Implementations perform exactly one request per call and never retry;
/// retry policy belongs to the caller.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// `GET /character-updates`
    async fn character_updates(&self) -> Result<CharacterState, ApiError>;

    /// `POST /fight-club/train {stat}`
    async fn train(&self, stat: TrainingStat) -> Result<TrainOutcome, ApiError>;

    /// Commit a crime or GTA, or start a heist.
    async fn perform(&self, kind: ActionKind, id: u64) -> Result<ActionOutcome, ApiError>;
}

/// Cooldown-gated game actions, listed in auto-crime priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Heist,
    Gta,
    Crime,
}

impl ActionKind {
    /// Priority order used by the auto-crime loop.
    pub const PRIORITY: [ActionKind; 3] = [ActionKind::Heist, ActionKind::Gta, ActionKind::Crime];

    pub fn endpoint(&self, id: u64) -> String {
        match self {
            ActionKind::Crime => format!("/crimes/{id}/commit"),
            ActionKind::Gta => format!("/gtas/{id}/commit"),
            ActionKind::Heist => format!("/heists/{id}/start"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActionKind::Crime => "Crime",
            ActionKind::Gta => "GTA",
            ActionKind::Heist => "Heist",
        }
    }

    /// The resource an action consumes.
    pub fn resource(&self) -> &'static str {
        match self {
            ActionKind::Crime => "nerve",
            ActionKind::Gta => "focus",
            ActionKind::Heist => "wit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crime" => Ok(ActionKind::Crime),
            "gta" => Ok(ActionKind::Gta),
            "heist" => Ok(ActionKind::Heist),
            other => Err(format!("unknown action '{other}' (expected crime, gta or heist)")),
        }
    }
}

/// Trainable stats in the fight club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStat {
    #[default]
    Health,
    Stamina,
    Strength,
    Speed,
    Endurance,
    Defence,
}

impl TrainingStat {
    pub const ALL: [TrainingStat; 6] = [
        TrainingStat::Health,
        TrainingStat::Stamina,
        TrainingStat::Strength,
        TrainingStat::Speed,
        TrainingStat::Endurance,
        TrainingStat::Defence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStat::Health => "health",
            TrainingStat::Stamina => "stamina",
            TrainingStat::Strength => "strength",
            TrainingStat::Speed => "speed",
            TrainingStat::Endurance => "endurance",
            TrainingStat::Defence => "defence",
        }
    }
}

impl fmt::Display for TrainingStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingStat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TrainingStat::ALL
            .into_iter()
            .find(|stat| stat.as_str() == wanted)
            .ok_or_else(|| format!("unknown stat '{wanted}'"))
    }
}

/// Result of a successful training call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    pub energy_cost: Option<Value>,
    pub exp_gained: Option<Value>,
    pub raw: Value,
}

impl TrainOutcome {
    pub fn from_value(raw: Value) -> Self {
        Self {
            energy_cost: present(&raw, "energy_cost"),
            exp_gained: present(&raw, "exp_gained"),
            raw,
        }
    }

    pub fn summary(&self, stat: TrainingStat) -> String {
        format!(
            "Trained {stat} successfully!\nEnergy used: {}\nExp gained: {}",
            display_or(&self.energy_cost, "N/A"),
            display_or(&self.exp_gained, "N/A"),
        )
    }
}

/// Result of a successful crime, GTA or heist call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub reward: Option<Value>,
    pub exp_gained: Option<Value>,
    /// Server-reported cooldown in whole seconds.
    pub cooldown_remaining: Option<u64>,
    pub raw: Value,
}

impl ActionOutcome {
    pub fn from_value(raw: Value) -> Self {
        let cooldown_remaining = raw
            .get("cooldown_remaining")
            .and_then(lenient_number)
            .map(|secs| secs.max(0.0).ceil() as u64);
        Self {
            reward: present(&raw, "reward"),
            exp_gained: present(&raw, "exp_gained"),
            cooldown_remaining,
            raw,
        }
    }

    pub fn summary(&self, kind: ActionKind) -> String {
        format!(
            "{kind} successful!\nReward: ${}\nExp gained: {}",
            display_or(&self.reward, "0"),
            display_or(&self.exp_gained, "0"),
        )
    }
}

fn present(raw: &Value, key: &str) -> Option<Value> {
    raw.get(key).filter(|v| !v.is_null()).cloned()
}

fn display_or(value: &Option<Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) | None => fallback.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_endpoints() {
        assert_eq!(ActionKind::Crime.endpoint(2), "/crimes/2/commit");
        assert_eq!(ActionKind::Gta.endpoint(1), "/gtas/1/commit");
        assert_eq!(ActionKind::Heist.endpoint(7), "/heists/7/start");
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            ActionKind::PRIORITY,
            [ActionKind::Heist, ActionKind::Gta, ActionKind::Crime]
        );
    }

    #[test]
    fn test_action_kind_parse() {
        assert_eq!("GTA".parse::<ActionKind>().unwrap(), ActionKind::Gta);
        assert!("burglary".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_training_stat_parse_and_display() {
        assert_eq!("Strength".parse::<TrainingStat>().unwrap(), TrainingStat::Strength);
        assert_eq!(TrainingStat::Defence.to_string(), "defence");
        assert!("luck".parse::<TrainingStat>().is_err());
        assert_eq!(TrainingStat::default(), TrainingStat::Health);
    }

    #[test]
    fn test_training_stat_serde() {
        let json = serde_json::to_value(TrainingStat::Speed).unwrap();
        assert_eq!(json, json!("speed"));
    }

    #[test]
    fn test_train_outcome_summary_with_missing_fields() {
        let outcome = TrainOutcome::from_value(json!({ "energy_cost": 5 }));
        let text = outcome.summary(TrainingStat::Strength);
        assert!(text.contains("Trained strength successfully!"));
        assert!(text.contains("Energy used: 5"));
        assert!(text.contains("Exp gained: N/A"));
    }

    #[test]
    fn test_action_outcome_cooldown_parsing() {
        let outcome = ActionOutcome::from_value(json!({ "cooldown_remaining": "9.2", "reward": 100 }));
        assert_eq!(outcome.cooldown_remaining, Some(10));
        assert!(outcome.summary(ActionKind::Heist).contains("Reward: $100"));

        let absent = ActionOutcome::from_value(json!({}));
        assert_eq!(absent.cooldown_remaining, None);
        assert!(absent.summary(ActionKind::Crime).contains("Exp gained: 0"));
    }

    #[test]
    fn test_negative_cooldown_clamps_to_zero() {
        let outcome = ActionOutcome::from_value(json!({ "cooldown_remaining": -3 }));
        assert_eq!(outcome.cooldown_remaining, Some(0));
    }
}
