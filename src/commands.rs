//! Subcommand handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use racketeer_automations::{AutomationError, Autopilot, LoopKind};
use racketeer_browser::CdpDomProbe;
use racketeer_config::{Config, ConfigValidator};
use racketeer_gateway::ApiGateway;
use racketeer_protocols::{
    ActionKind, DomProbe, ElementInfo, GameApi, ProbeError, TrainingStat,
};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Probe used when no browser is attached.
struct DetachedProbe;

#[async_trait]
impl DomProbe for DetachedProbe {
    async fn clickable_elements(&self) -> Result<Vec<ElementInfo>, ProbeError> {
        Err(ProbeError::Unavailable("no browser attached".to_string()))
    }

    async fn click(&self, element: &ElementInfo) -> Result<(), ProbeError> {
        Err(ProbeError::ElementGone(element.index))
    }
}

fn gateway(config: &Config) -> Arc<dyn GameApi> {
    Arc::new(ApiGateway::new(&config.api))
}

fn detached(config: Config) -> Autopilot {
    let api = gateway(&config);
    Autopilot::new(config, api, Arc::new(DetachedProbe))
}

/// Validate, refusing to go on when there are errors.
pub(crate) fn validate(config: &Config) -> CmdResult {
    for warning in ConfigValidator::validate(config).into_result()? {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(())
}

pub(crate) async fn run(mut config: Config, bust: bool, trainer: bool, crimes: bool) -> CmdResult {
    config.bust.enabled |= bust;
    config.trainer.enabled |= trainer;
    config.crimes.enabled |= crimes;
    validate(&config)?;

    info!("Starting Racketeer v{}", env!("CARGO_PKG_VERSION"));

    let probe: Arc<dyn DomProbe> = if config.bust.enabled {
        Arc::new(CdpDomProbe::connect(&config.browser, &config.bust.selector).await?)
    } else {
        Arc::new(DetachedProbe)
    };
    let api = gateway(&config);
    let pilot = Autopilot::new(config, api, probe);
    info!("API base URL: {}", pilot.config().api.base_url);

    let started = pilot.start_enabled().await;
    if started.is_empty() {
        warn!("No automation enabled; use --bust, --trainer or --crimes");
        return Ok(());
    }
    let names: Vec<&str> = started.iter().map(LoopKind::as_str).collect();
    info!("Running: {} (Ctrl-C to stop)", names.join(", "));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    for kind in started {
        let status = pilot.status(kind);
        info!(
            "{}: {} ({})",
            kind,
            status.label(),
            status.message.map(|m| m.text).unwrap_or_default()
        );
    }
    let stats = pilot.cache_stats();
    info!(
        "Character cache: {} fetches, {} failures, {} hits, {} coalesced, {} dropped",
        stats.fetches, stats.failures, stats.hits, stats.coalesced, stats.dropped
    );

    pilot.destroy().await;
    Ok(())
}

pub(crate) fn check(config: &Config) -> CmdResult {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if result.is_valid() {
        println!("Configuration is valid");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}

pub(crate) async fn fetch(config: Config) -> CmdResult {
    validate(&config)?;
    let pilot = detached(config);
    let character = pilot
        .character_updates(true)
        .await
        .ok_or("Failed to fetch character updates")?;
    println!("{}", serde_json::to_string_pretty(character.raw())?);
    Ok(())
}

pub(crate) async fn train(config: Config, stat: Option<TrainingStat>) -> CmdResult {
    validate(&config)?;
    let pilot = detached(config);
    let stat = stat.unwrap_or(pilot.settings().train_stat);
    report(pilot.manual_train(Some(stat)).await.map(|o| o.summary(stat)))
}

pub(crate) async fn act(config: Config, kind: ActionKind, id: Option<u64>) -> CmdResult {
    validate(&config)?;
    let pilot = detached(config);
    report(pilot.act(kind, id).await.map(|o| o.summary(kind)))
}

/// Print the summary. A local refusal is not a failure of the command.
fn report(result: Result<String, AutomationError>) -> CmdResult {
    match result {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) if e.is_precondition() => {
            println!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
