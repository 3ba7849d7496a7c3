//! Core data models for the panel feed
//!
//! Every reading and row here is built fresh for a single request. Nothing is
//! cached or mutated after construction.

pub mod extract;
pub mod fetch;
pub mod home_assistant;
pub mod weather;
pub mod window;

pub use extract::{CurrentConditions, ExtractError, HourlyEntry};
pub use fetch::{FetchError, Fetcher, DEFAULT_TIMEOUT};
pub use home_assistant::HomeAssistantClient;
pub use weather::{WeatherClient, OPEN_METEO_BASE_URL};
pub use window::{build_window, TimeWindow};

use serde::Serialize;

use crate::glyphs::Glyph;

/// Display value for a missing numeric entity state
pub const STATE_SENTINEL: f64 = -1.0;

/// Display value for a missing textual entity state
pub const STATE_TEXT_SENTINEL: &str = "-1";

/// Display value for a missing historical reading
pub const HISTORY_SENTINEL: f64 = -100.0;

/// Result of a single sensor query
///
/// `NoData` covers transport failure, unparseable payloads and absent fields
/// alike. Use [`Reading::or_sentinel`] only at the display edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Reading<T> {
    Value(T),
    NoData,
}

impl<T> Reading<T> {
    /// Whether the query produced nothing usable
    pub fn is_no_data(&self) -> bool {
        matches!(self, Reading::NoData)
    }

    /// The value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Reading::Value(value) => Some(value),
            Reading::NoData => None,
        }
    }

    /// The value, or the reserved display sentinel
    pub fn or_sentinel(self, sentinel: T) -> T {
        self.value().unwrap_or(sentinel)
    }

    /// Transforms a present value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Value(value) => Reading::Value(f(value)),
            Reading::NoData => Reading::NoData,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Reading::Value(value),
            None => Reading::NoData,
        }
    }
}

/// Current-conditions row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// WMO weather code
    pub weather_code: i32,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind bearing in degrees
    pub wind_direction: i32,
    /// Condition icon, blank for codes outside the table
    pub weather_icon: Glyph,
    /// Compass icon for the wind bearing
    pub wind_direction_icon: Glyph,
}

impl WeatherSnapshot {
    /// The row as display strings: code, speed (one decimal), bearing, weather icon, wind icon
    pub fn columns(&self) -> [String; 5] {
        [
            self.weather_code.to_string(),
            format!("{:.1}", self.wind_speed),
            self.wind_direction.to_string(),
            self.weather_icon.to_string(),
            self.wind_direction_icon.to_string(),
        ]
    }
}

/// One row of the hourly forecast table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    /// Local ISO 8601 time as sent by the forecast API
    pub time: String,
    /// Temperature in °C
    pub temperature: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Condition icon, blank for codes outside the table
    pub icon: Glyph,
}

impl HourlyRow {
    /// The row as display strings: time, temperature (one decimal), icon
    ///
    /// Codes without an icon show the raw code instead.
    pub fn columns(&self) -> [String; 3] {
        let icon = if self.icon.is_blank() {
            self.weather_code.to_string()
        } else {
            self.icon.to_string()
        };

        [self.time.clone(), format!("{:.1}", self.temperature), icon]
    }
}
