use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "https://api.mobsteria.com/api");
    assert!(config.api.auth_token.is_empty());
    assert!(!config.bust.enabled);
    assert!(!config.trainer.enabled);
    assert!(!config.crimes.enabled);
}

#[test]
fn test_throttling_defaults() {
    let throttling = ThrottlingConfig::default();
    assert_eq!(throttling.cooldown(), Duration::from_millis(2000));
    assert_eq!(throttling.cache_expiry(), Duration::from_millis(5000));
    assert_eq!(throttling.max_queue_size, 5);
}

#[test]
fn test_bust_defaults() {
    let bust = BustConfig::default();
    assert_eq!(bust.scan_interval_ms, 100);
    assert_eq!(bust.jitter_ms, 50);
    assert_eq!(bust.pause_ms, 300);
    assert_eq!(bust.lexicon, vec!["bust", "self bust"]);
    assert_eq!(
        bust.preferred_classes,
        vec!["shadow-deep-green", "shadow-deep-yellow"]
    );
    assert_eq!(bust.selector, "button");
}

#[test]
fn test_trainer_defaults() {
    let trainer = TrainerConfig::default();
    assert_eq!(trainer.interval_minutes, 1);
    assert_eq!(trainer.min_energy, 10);
    assert_eq!(trainer.stat, TrainingStat::Health);
    assert_eq!(trainer.retry_after(), Duration::from_secs(60));
}

#[test]
fn test_crimes_defaults() {
    let crimes = CrimesConfig::default();
    assert_eq!(crimes.interval(), Duration::from_millis(5000));
    assert_eq!(crimes.default_crime_id, 2);
    assert_eq!(crimes.default_gta_id, 1);
    assert_eq!(crimes.default_heist_id, 1);
    assert!(crimes.crime_id.is_none());
    assert_eq!(crimes.costs, ResourceCosts::default());
}

#[test]
fn test_automation_settings_from_config() {
    let mut config = Config::default();
    config.bust.scan_interval_ms = 250;
    config.trainer.stat = TrainingStat::Speed;
    config.crimes.gta_id = Some(3);
    config.crimes.costs.heist_wit = 40;

    let settings = config.automation_settings();
    assert_eq!(settings.scan_interval_ms, 250);
    assert_eq!(settings.train_stat, TrainingStat::Speed);
    assert_eq!(settings.gta_id, Some(3));
    assert_eq!(settings.costs.heist_wit, 40);
}

#[test]
fn test_config_serialization_skips_empty_ids() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("api.mobsteria.com"));
    assert!(!json.contains("\"crime_id\""));
}

#[test]
fn test_partial_costs_keep_defaults() {
    let config: Config = toml::from_str(
        r#"
        [crimes.costs]
        crime_nerve = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.crimes.costs.crime_nerve, 4);
    assert_eq!(config.crimes.costs.gta_focus, 15);
}
