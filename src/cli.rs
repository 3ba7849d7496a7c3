//! Command-line interface parsing for hapanel
//!
//! Connection settings come from flags or the environment (a `.env` file is
//! loaded by the binary first). They are turned into a read-only
//! `StartupConfig` once and handed to the clients at construction.

use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::data::OPEN_METEO_BASE_URL;

/// Default panel location (Warsaw, Bemowo)
pub const DEFAULT_LATITUDE: f64 = 52.2546;
pub const DEFAULT_LONGITUDE: f64 = 20.9084;

/// Error types for configuration checks
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No Home Assistant base URL was given
    #[error("Home Assistant base URL not set: use --ha-url or HA_BASE_URL")]
    MissingBaseUrl,

    /// No Home Assistant access token was given
    #[error("Home Assistant token not set: use --ha-token or HA_TOKEN")]
    MissingToken,
}

/// hapanel - Home Assistant and Open-Meteo readings for small displays
#[derive(Parser, Debug)]
#[command(name = "hapanel")]
#[command(about = "Home Assistant sensor values and Open-Meteo weather as display rows")]
#[command(version)]
pub struct Cli {
    /// Home Assistant base URL, e.g. http://homeassistant.local:8123
    #[arg(long, env = "HA_BASE_URL", global = true)]
    pub ha_url: Option<String>,

    /// Home Assistant long-lived access token
    #[arg(long, env = "HA_TOKEN", global = true, hide_env_values = true)]
    pub ha_token: Option<String>,

    /// Forecast latitude
    #[arg(long, env = "PANEL_LATITUDE", global = true, allow_negative_numbers = true, default_value_t = DEFAULT_LATITUDE)]
    pub latitude: f64,

    /// Forecast longitude
    #[arg(long, env = "PANEL_LONGITUDE", global = true, allow_negative_numbers = true, default_value_t = DEFAULT_LONGITUDE)]
    pub longitude: f64,

    /// Open-Meteo forecast endpoint
    #[arg(long, env = "OPEN_METEO_URL", global = true, default_value = OPEN_METEO_BASE_URL)]
    pub forecast_url: String,

    /// Per-request timeout in milliseconds, at least 1
    #[arg(
        long,
        global = true,
        default_value_t = 4000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,

    /// Print JSON instead of tab-separated rows
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per public operation
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw state text of an entity ("-1" if unavailable)
    State {
        /// Entity id, e.g. sensor.outdoor_temperature
        entity: String,
    },

    /// Numeric state of an entity (-1 if unavailable)
    Value {
        /// Entity id, e.g. sensor.outdoor_temperature
        entity: String,
    },

    /// First recorded value in a past window (-100 if unavailable)
    ///
    /// The window ends SHIFT * GRANULARITY minutes ago and is GRANULARITY
    /// minutes wide.
    History {
        /// Entity id, e.g. sensor.outdoor_temperature
        entity: String,

        /// Number of granularity steps back from now
        #[arg(long, default_value_t = 1)]
        shift: u32,

        /// Window width in minutes
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
        granularity: u32,
    },

    /// Current weather code, wind speed, bearing and icons
    Current {
        /// Palette selector; inside 6..=19 uses daytime icons. Defaults to the local hour
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i32>,
    },

    /// Today's hourly forecast with icons
    Hourly,

    /// Short weekday label OFFSET days from today
    Day {
        /// Days from today, may be negative
        #[arg(allow_negative_numbers = true, default_value_t = 0)]
        offset: i64,
    },
}

/// Connection settings for Home Assistant
#[derive(Debug, Clone, PartialEq)]
pub struct HomeAssistantConfig {
    pub base_url: String,
    pub token: String,
}

/// Location and endpoint for Open-Meteo
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: OPEN_METEO_BASE_URL.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Home Assistant URL, if given
    pub ha_url: Option<String>,
    /// Home Assistant token, if given
    pub ha_token: Option<String>,
    /// Forecast location and endpoint
    pub forecast: ForecastConfig,
    /// Bound on each request
    pub timeout: Duration,
    /// Output format
    pub json: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            ha_url: None,
            ha_token: None,
            forecast: ForecastConfig::default(),
            timeout: crate::data::DEFAULT_TIMEOUT,
            json: false,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        StartupConfig {
            ha_url: non_empty(cli.ha_url.as_deref()),
            ha_token: non_empty(cli.ha_token.as_deref()),
            forecast: ForecastConfig {
                base_url: cli.forecast_url.clone(),
                latitude: cli.latitude,
                longitude: cli.longitude,
            },
            timeout: Duration::from_millis(cli.timeout_ms),
            json: cli.json,
        }
    }

    /// Home Assistant settings, required by the state, value and history commands
    ///
    /// # Returns
    /// * `Ok(HomeAssistantConfig)` if both URL and token are present
    /// * `Err(ConfigError)` naming the first missing setting
    pub fn home_assistant(&self) -> Result<HomeAssistantConfig, ConfigError> {
        let base_url = self.ha_url.clone().ok_or(ConfigError::MissingBaseUrl)?;
        let token = self.ha_token.clone().ok_or(ConfigError::MissingToken)?;
        Ok(HomeAssistantConfig { base_url, token })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
