//! Configuration validation.

use std::ops::RangeInclusive;

use crate::error::ConfigError;
use crate::live::{MIN_ENERGY_RANGE, SCAN_INTERVAL_RANGE_MS, TRAIN_INTERVAL_RANGE_MINUTES};
use crate::schema::Config;

const PLACEHOLDER_TOKEN: &str = "YOUR_AUTH_TOKEN_HERE";

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(ConfigError::InvalidValue {
                field: first.path,
                message: first.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_api(config, &mut result);
        Self::validate_throttling(config, &mut result);
        Self::validate_bust(config, &mut result);
        Self::validate_trainer(config, &mut result);
        Self::validate_crimes(config, &mut result);

        result
    }

    fn validate_api(config: &Config, result: &mut ValidationResult) {
        let base_url = config.api.base_url.trim();
        if base_url.is_empty() {
            result.add_error(ValidationError::new("api.base_url", "Base URL cannot be empty"));
        } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "api.base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        let token = config.api.auth_token.trim();
        if token.is_empty() {
            result.add_warning(ValidationWarning::new(
                "api.auth_token",
                "No auth token configured, every API call will be rejected",
            ));
        } else if token.contains(PLACEHOLDER_TOKEN) {
            result.add_warning(ValidationWarning::new(
                "api.auth_token",
                "Auth token is still the placeholder value",
            ));
        } else if token.starts_with("Bearer ") {
            result.add_warning(ValidationWarning::new(
                "api.auth_token",
                "Auth token should not include the 'Bearer ' prefix",
            ));
        }
    }

    fn validate_throttling(config: &Config, result: &mut ValidationResult) {
        let throttling = &config.throttling;
        if throttling.max_queue_size == 0 {
            result.add_error(ValidationError::new(
                "throttling.max_queue_size",
                "max_queue_size must be at least 1",
            ));
        }

        if throttling.cache_expiry_ms < throttling.cooldown_ms {
            result.add_warning(ValidationWarning::new(
                "throttling.cache_expiry_ms",
                "cache expiry is shorter than the refresh cooldown, unforced reads will mostly see stale data",
            ));
        }
    }

    fn validate_bust(config: &Config, result: &mut ValidationResult) {
        check_range(
            result,
            "bust.scan_interval_ms",
            config.bust.scan_interval_ms,
            &SCAN_INTERVAL_RANGE_MS,
        );

        if config.bust.jitter_ms >= config.bust.scan_interval_ms {
            result.add_warning(ValidationWarning::new(
                "bust.jitter_ms",
                "jitter is not smaller than the scan interval, some intervals will collapse to the minimum",
            ));
        }

        if config.bust.lexicon.iter().all(|word| word.trim().is_empty()) {
            result.add_error(ValidationError::new(
                "bust.lexicon",
                "lexicon must contain at least one non-empty word",
            ));
        }

        if config.bust.selector.trim().is_empty() {
            result.add_error(ValidationError::new("bust.selector", "selector cannot be empty"));
        }
    }

    fn validate_trainer(config: &Config, result: &mut ValidationResult) {
        check_range(
            result,
            "trainer.interval_minutes",
            config.trainer.interval_minutes,
            &TRAIN_INTERVAL_RANGE_MINUTES,
        );
        check_range(
            result,
            "trainer.min_energy",
            config.trainer.min_energy,
            &MIN_ENERGY_RANGE,
        );

        if config.trainer.retry_after_secs == 0 {
            result.add_error(ValidationError::new(
                "trainer.retry_after_secs",
                "retry_after_secs must be greater than 0",
            ));
        }
    }

    fn validate_crimes(config: &Config, result: &mut ValidationResult) {
        if config.crimes.interval_ms == 0 {
            result.add_error(ValidationError::new(
                "crimes.interval_ms",
                "interval_ms must be greater than 0",
            ));
        }

        for (path, id) in [
            ("crimes.default_crime_id", config.crimes.default_crime_id),
            ("crimes.default_gta_id", config.crimes.default_gta_id),
            ("crimes.default_heist_id", config.crimes.default_heist_id),
        ] {
            if id == 0 {
                result.add_error(ValidationError::new(path, "action ids start at 1"));
            }
        }

        if config.crimes.default_cooldown_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "crimes.default_cooldown_secs",
                "a zero failure cooldown lets a failing endpoint be retried every tick",
            ));
        }
    }
}

fn check_range<T>(result: &mut ValidationResult, path: &str, value: T, range: &RangeInclusive<T>)
where
    T: PartialOrd + std::fmt::Display,
{
    if !range.contains(&value) {
        result.add_error(ValidationError::new(
            path,
            format!(
                "{} must be between {} and {} (got {})",
                path.rsplit('.').next().unwrap_or(path),
                range.start(),
                range.end(),
                value
            ),
        ));
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
