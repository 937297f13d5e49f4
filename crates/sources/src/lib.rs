//! inkdash-sources: Data source implementations for the inkdash dashboard.

mod btc;
mod calendar;
mod github;
mod http;
mod todo;
mod vps;
mod weather;

pub use btc::{parse_price, trend, BtcSource, TREND_THRESHOLD};
pub use calendar::{week_progress, CalendarSource};
pub use github::{parse_contributions, CommitCounts, GithubConfig, GithubSource, YearSummary};
pub use http::build_client;
pub use todo::{parse_markdown, TaskConfig, TaskLists, TaskSource};
pub use vps::{parse_usage, VpsConfig, VpsSource};
pub use weather::{parse_weather, WeatherConfig, WeatherSource};

use chrono_tz::Tz;
use inkdash_core::{ConfigError, Registry, DEFAULT_PROVIDER_TIMEOUT};
use std::time::Duration;

/// Settings for every built-in source
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesConfig {
    pub timezone: Tz,
    /// Request timeout for network sources
    pub timeout: Duration,
    pub weather: WeatherConfig,
    pub github: GithubConfig,
    pub vps: VpsConfig,
    pub tasks: TaskConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            weather: WeatherConfig::default(),
            github: GithubConfig::default(),
            vps: VpsConfig::default(),
            tasks: TaskConfig::default(),
        }
    }
}

/// Register all built-in sources.
///
/// Sources without credentials are still registered; they report
/// `Unavailable::NotConfigured` so their fields render as placeholders.
pub fn register_all(registry: &mut Registry, config: &SourcesConfig) -> Result<(), ConfigError> {
    let client = build_client(config.timeout)?;

    let timezone = config.timezone;
    registry.register_source("calendar", move || Box::new(CalendarSource::new(timezone)));

    let (weather, http) = (config.weather.clone(), client.clone());
    registry.register_source("weather", move || {
        Box::new(WeatherSource::new(weather.clone(), http.clone()))
    });

    let (github, http) = (config.github.clone(), client.clone());
    registry.register_source("commits", move || {
        Box::new(GithubSource::new(github.clone(), timezone, http.clone()))
    });

    let (vps, http) = (config.vps.clone(), client.clone());
    registry.register_source("vps", move || Box::new(VpsSource::new(vps.clone(), http.clone())));

    let http = client;
    registry.register_source("btc", move || Box::new(BtcSource::new(http.clone())));

    let tasks = config.tasks.clone();
    registry.register_source("tasks", move || Box::new(TaskSource::new(tasks.clone())));

    log::debug!("Registered {} data sources", registry.len());
    Ok(())
}
