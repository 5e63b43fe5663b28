//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use racketeer_protocols::{AutomationSettings, ResourceCosts, TrainingStat};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub throttling: ThrottlingConfig,

    #[serde(default)]
    pub bust: BustConfig,

    #[serde(default)]
    pub trainer: TrainerConfig,

    #[serde(default)]
    pub crimes: CrimesConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Initial values for the live settings store.
    pub fn automation_settings(&self) -> AutomationSettings {
        AutomationSettings {
            scan_interval_ms: self.bust.scan_interval_ms,
            train_interval_minutes: self.trainer.interval_minutes,
            min_energy: self.trainer.min_energy,
            train_stat: self.trainer.stat,
            crime_id: self.crimes.crime_id,
            gta_id: self.crimes.gta_id,
            heist_id: self.crimes.heist_id,
            costs: self.crimes.costs,
        }
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token, without the `Bearer ` prefix.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: String::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.mobsteria.com/api".to_string()
}

/// Character-update throttling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottlingConfig {
    /// Minimum time between two refresh starts.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// How long a fetched value satisfies unforced reads.
    #[serde(default = "default_cache_expiry_ms")]
    pub cache_expiry_ms: u64,

    /// Waiters allowed behind an in-flight refresh.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

impl ThrottlingConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn cache_expiry(&self) -> Duration {
        Duration::from_millis(self.cache_expiry_ms)
    }
}

impl Default for ThrottlingConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            cache_expiry_ms: default_cache_expiry_ms(),
            max_queue_size: default_max_queue_size(),
        }
    }
}

fn default_cooldown_ms() -> u64 {
    2000
}

fn default_cache_expiry_ms() -> u64 {
    5000
}

fn default_max_queue_size() -> usize {
    5
}

/// Bust scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BustConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,

    /// Half-width of the random offset applied to every interval.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,

    /// Base pause after a click before scanning resumes.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Button texts that count as a match (compared trimmed, lower-cased).
    #[serde(default = "default_lexicon")]
    pub lexicon: Vec<String>,

    /// Marker classes in order of preference.
    #[serde(default = "default_preferred_classes")]
    pub preferred_classes: Vec<String>,

    /// CSS selector for candidate elements.
    #[serde(default = "default_selector")]
    pub selector: String,
}

impl Default for BustConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scan_interval_ms: default_scan_interval_ms(),
            jitter_ms: default_jitter_ms(),
            pause_ms: default_pause_ms(),
            lexicon: default_lexicon(),
            preferred_classes: default_preferred_classes(),
            selector: default_selector(),
        }
    }
}

fn default_scan_interval_ms() -> u64 {
    100
}

fn default_jitter_ms() -> u64 {
    50
}

fn default_pause_ms() -> u64 {
    300
}

fn default_lexicon() -> Vec<String> {
    vec!["bust".to_string(), "self bust".to_string()]
}

fn default_preferred_classes() -> Vec<String> {
    vec![
        "shadow-deep-green".to_string(),
        "shadow-deep-yellow".to_string(),
    ]
}

fn default_selector() -> String {
    "button".to_string()
}

/// Auto-trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    #[serde(default = "default_min_energy")]
    pub min_energy: u32,

    #[serde(default)]
    pub stat: TrainingStat,

    /// Delay before the next attempt after a failed training call.
    #[serde(default = "default_retry_after_secs")]
    pub retry_after_secs: u64,
}

impl TrainerConfig {
    pub fn retry_after(&self) -> Duration {
        Duration::from_secs(self.retry_after_secs)
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: default_interval_minutes(),
            min_energy: default_min_energy(),
            stat: TrainingStat::default(),
            retry_after_secs: default_retry_after_secs(),
        }
    }
}

fn default_interval_minutes() -> u64 {
    1
}

fn default_min_energy() -> u32 {
    10
}

fn default_retry_after_secs() -> u64 {
    60
}

/// Auto-crime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimesConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_crimes_interval_ms")]
    pub interval_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crime_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gta_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heist_id: Option<u64>,

    #[serde(default = "default_crime_id")]
    pub default_crime_id: u64,

    #[serde(default = "default_gta_id")]
    pub default_gta_id: u64,

    #[serde(default = "default_heist_id")]
    pub default_heist_id: u64,

    /// Cooldown applied after a failed attempt.
    #[serde(default = "default_cooldown_secs")]
    pub default_cooldown_secs: u64,

    #[serde(default)]
    pub costs: ResourceCosts,
}

impl CrimesConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for CrimesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_crimes_interval_ms(),
            crime_id: None,
            gta_id: None,
            heist_id: None,
            default_crime_id: default_crime_id(),
            default_gta_id: default_gta_id(),
            default_heist_id: default_heist_id(),
            default_cooldown_secs: default_cooldown_secs(),
            costs: ResourceCosts::default(),
        }
    }
}

fn default_crimes_interval_ms() -> u64 {
    5000
}

fn default_crime_id() -> u64 {
    2
}

fn default_gta_id() -> u64 {
    1
}

fn default_heist_id() -> u64 {
    1
}

fn default_cooldown_secs() -> u64 {
    10
}

/// Chrome DevTools endpoint used by the bust scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Attach to the first page whose URL contains this string.
    #[serde(default = "default_page_url_contains")]
    pub page_url_contains: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_url_contains: default_page_url_contains(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_page_url_contains() -> String {
    "mobsteria".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.racketeer/logs".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
