//! Open-Meteo weather API client
//!
//! Fetches current conditions and the hourly forecast for one location and
//! turns them into icon-annotated display rows.

use std::time::Duration;

use tracing::warn;

use super::extract::{extract_current, extract_hourly, CurrentConditions, HourlyEntry};
use super::fetch::{FetchError, Fetcher};
use super::{HourlyRow, WeatherSnapshot};
use crate::cli::ForecastConfig;
use crate::glyphs::{classify_weather, classify_wind_direction, hourly_mode, snapshot_mode};

/// Base URL for the Open-Meteo API
pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Client for fetching weather data from Open-Meteo API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    fetcher: Fetcher,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl WeatherClient {
    /// Create a new WeatherClient for the configured location
    pub fn new(config: &ForecastConfig, timeout: Duration) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(timeout, None)?;
        Ok(Self::with_fetcher(fetcher, config))
    }

    /// Create a new WeatherClient with a custom fetcher
    pub fn with_fetcher(fetcher: Fetcher, config: &ForecastConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }

    /// URL for the current-conditions query
    pub fn current_url(&self) -> String {
        format!(
            "{}?latitude={:.4}&longitude={:.4}&current=weather_code,wind_speed_10m,wind_direction_10m",
            self.base_url, self.latitude, self.longitude
        )
    }

    /// URL for today's hourly forecast
    pub fn hourly_url(&self) -> String {
        format!(
            "{}?latitude={:.4}&longitude={:.4}&hourly=temperature_2m,weather_code&forecast_days=1",
            self.base_url, self.latitude, self.longitude
        )
    }

    /// Fetch current weather and wind as a single row
    ///
    /// # Arguments
    /// * `threshold` - Caller-supplied value (usually the local hour) choosing
    ///   between the daytime and quiet-hours palettes, see [`snapshot_mode`]
    ///
    /// # Returns
    /// * `Some(WeatherSnapshot)` - The current-conditions row
    /// * `None` - If the request or extraction failed
    pub async fn current_weather(&self, threshold: i32) -> Option<WeatherSnapshot> {
        let body = match self.fetcher.fetch(&self.current_url(), false).await {
            Ok(body) => body,
            Err(e) => {
                warn!(query = "current", error = %e, "no forecast payload");
                return None;
            }
        };

        match extract_current(&body) {
            Ok(conditions) => Some(build_snapshot(&conditions, threshold)),
            Err(e) => {
                warn!(query = "current", error = %e, "forecast extraction failed");
                None
            }
        }
    }

    /// Fetch today's hourly forecast as rows in source order
    ///
    /// Returns an empty table if the request or extraction failed.
    pub async fn hourly_weather(&self) -> Vec<HourlyRow> {
        let body = match self.fetcher.fetch(&self.hourly_url(), false).await {
            Ok(body) => body,
            Err(e) => {
                warn!(query = "hourly", error = %e, "no forecast payload");
                return Vec::new();
            }
        };

        match extract_hourly(&body) {
            Ok(entries) => build_hourly_rows(entries),
            Err(e) => {
                warn!(query = "hourly", error = %e, "forecast extraction failed");
                Vec::new()
            }
        }
    }
}

/// Annotates current conditions with weather and compass icons
pub fn build_snapshot(conditions: &CurrentConditions, threshold: i32) -> WeatherSnapshot {
    WeatherSnapshot {
        weather_code: conditions.weather_code,
        wind_speed: conditions.wind_speed,
        wind_direction: conditions.wind_direction,
        weather_icon: classify_weather(conditions.weather_code, snapshot_mode(threshold)),
        wind_direction_icon: classify_wind_direction(conditions.wind_direction),
    }
}

/// Annotates hourly entries with icons, picking day or night by row index
pub fn build_hourly_rows(entries: Vec<HourlyEntry>) -> Vec<HourlyRow> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| HourlyRow {
            icon: classify_weather(entry.weather_code, hourly_mode(index)),
            time: entry.time,
            temperature: entry.temperature,
            weather_code: entry.weather_code,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::DEFAULT_TIMEOUT;
    use crate::glyphs::WeatherMode;

    fn config() -> ForecastConfig {
        ForecastConfig {
            base_url: OPEN_METEO_BASE_URL.to_string(),
            latitude: 52.2546,
            longitude: 20.9084,
        }
    }

    fn entry(hour: usize, code: i32) -> HourlyEntry {
        HourlyEntry {
            time: format!("2024-07-15T{:02}:00", hour),
            temperature: 15.0 + hour as f64 / 2.0,
            weather_code: code,
        }
    }

    #[test]
    fn test_urls() {
        let client = WeatherClient::new(&config(), DEFAULT_TIMEOUT).unwrap();

        assert_eq!(
            client.current_url(),
            "https://api.open-meteo.com/v1/forecast?latitude=52.2546&longitude=20.9084&current=weather_code,wind_speed_10m,wind_direction_10m"
        );
        assert_eq!(
            client.hourly_url(),
            "https://api.open-meteo.com/v1/forecast?latitude=52.2546&longitude=20.9084&hourly=temperature_2m,weather_code&forecast_days=1"
        );
    }

    #[test]
    fn test_build_snapshot_daytime() {
        let conditions = CurrentConditions {
            weather_code: 1,
            wind_speed: 8.04,
            wind_direction: 180,
        };
        let snapshot = build_snapshot(&conditions, 12);

        assert_eq!(snapshot.weather_icon, classify_weather(1, WeatherMode::Day));
        assert_eq!(snapshot.wind_direction_icon.as_str(), "\u{f044}");
        assert_eq!(snapshot.columns()[1], "8.0");
    }

    #[test]
    fn test_build_snapshot_quiet_hours() {
        let conditions = CurrentConditions {
            weather_code: 0,
            wind_speed: 2.0,
            wind_direction: 10,
        };

        let late = build_snapshot(&conditions, 22);
        let early = build_snapshot(&conditions, 5);
        assert_eq!(late.weather_icon, classify_weather(0, WeatherMode::Calm));
        assert_eq!(early.weather_icon, late.weather_icon);
        assert_eq!(late.wind_direction_icon.as_str(), "\u{f058}");
    }

    #[test]
    fn test_build_snapshot_unknown_code() {
        let conditions = CurrentConditions {
            weather_code: 999,
            wind_speed: 2.0,
            wind_direction: 90,
        };
        let snapshot = build_snapshot(&conditions, 12);

        assert!(snapshot.weather_icon.is_blank());
        assert!(!snapshot.wind_direction_icon.is_blank());
    }

    #[test]
    fn test_build_hourly_rows_day_and_night() {
        let entries: Vec<HourlyEntry> = (0..24).map(|hour| entry(hour, 0)).collect();
        let rows = build_hourly_rows(entries);

        assert_eq!(rows.len(), 24);
        for (index, row) in rows.iter().enumerate() {
            let expected = if (6..20).contains(&index) {
                WeatherMode::Day
            } else {
                WeatherMode::Night
            };
            assert_eq!(row.icon, classify_weather(0, expected), "row {}", index);
        }
        assert_eq!(rows[0].time, "2024-07-15T00:00");
        assert_eq!(rows[23].time, "2024-07-15T23:00");
    }

    #[test]
    fn test_build_hourly_rows_unknown_code_is_blank() {
        let rows = build_hourly_rows(vec![entry(0, 61), entry(1, 999), entry(2, 95)]);

        assert!(!rows[0].icon.is_blank());
        assert!(rows[1].icon.is_blank());
        assert_eq!(rows[1].columns()[2], "999");
        assert!(!rows[2].icon.is_blank());
    }

    #[test]
    fn test_build_hourly_rows_empty() {
        assert!(build_hourly_rows(Vec::new()).is_empty());
    }
}
