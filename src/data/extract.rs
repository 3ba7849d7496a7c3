//! Typed extraction of upstream JSON payloads
//!
//! Each upstream endpoint gets its own shape. A payload that does not parse and
//! a payload that parses but lacks an expected field both end up as an
//! `ExtractError`; callers turn either into "no data". Entity and block
//! shapes must arrive as JSON objects; serde would otherwise accept a struct
//! written as an array.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while extracting fields from a payload
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or null field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(&'static str),

    /// A value that should be an object arrived as something else
    #[error("Expected a JSON object for {0}")]
    NotAnObject(&'static str),
}

/// Deserializes `value` into `T` only if it is a JSON object
fn from_object<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<T, ExtractError> {
    if !value.is_object() {
        return Err(ExtractError::NotAnObject(what));
    }
    Ok(serde_json::from_value(value)?)
}

/// Parses a whole body that must be a JSON object
fn parse_object<T: DeserializeOwned>(body: &str, what: &'static str) -> Result<T, ExtractError> {
    let value: Value = serde_json::from_str(body)?;
    from_object(value, what)
}

/// Deserializes an optional nested block, rejecting non-object values
fn nested_object<T: DeserializeOwned>(
    value: Option<Value>,
    what: &'static str,
) -> Result<T, ExtractError> {
    let value = value.ok_or(ExtractError::MissingField(what))?;
    from_object(value, what)
}

/// A Home Assistant `state` value
///
/// The API always sends a string, but numbers and booleans are accepted and
/// rendered the same way a JSON serializer would print them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl StateValue {
    /// The state as display text
    pub fn into_text(self) -> String {
        match self {
            StateValue::Text(text) => text,
            StateValue::Number(number) => number.to_string(),
            StateValue::Flag(flag) => flag.to_string(),
        }
    }
}

/// Entity object from `/api/states/{entity}` or one entry of a history series
#[derive(Debug, Deserialize)]
struct EntityState {
    #[serde(default)]
    state: Option<StateValue>,
}

/// Extracts the `state` field of a single entity
pub fn extract_state(body: &str) -> Result<String, ExtractError> {
    let entity: EntityState = parse_object(body, "entity")?;
    entity
        .state
        .map(StateValue::into_text)
        .ok_or(ExtractError::MissingField("state"))
}

/// Extracts the first state of the first series in a history response
///
/// The history endpoint answers with an array of series, one per entity.
pub fn extract_history_state(body: &str) -> Result<String, ExtractError> {
    let series: Vec<Vec<Value>> = serde_json::from_str(body)?;
    let first = series
        .into_iter()
        .next()
        .and_then(|entries| entries.into_iter().next())
        .ok_or(ExtractError::MissingField("[0][0]"))?;

    let entry: EntityState = from_object(first, "[0][0]")?;
    entry
        .state
        .map(StateValue::into_text)
        .ok_or(ExtractError::MissingField("[0][0].state"))
}

/// Current conditions from the Open-Meteo `current` block
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// WMO weather code
    pub weather_code: i32,
    /// Wind speed at 10 m in km/h
    pub wind_speed: f64,
    /// Wind bearing at 10 m in whole degrees
    pub wind_direction: i32,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    current: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    #[serde(default)]
    weather_code: Option<f64>,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
    #[serde(default)]
    wind_direction_10m: Option<f64>,
}

/// Extracts weather code, wind speed and wind direction
///
/// Integral fields are truncated toward zero if the API sends a fraction.
pub fn extract_current(body: &str) -> Result<CurrentConditions, ExtractError> {
    let response: CurrentResponse = parse_object(body, "response")?;
    let current: CurrentBlock = nested_object(response.current, "current")?;

    let weather_code = current
        .weather_code
        .ok_or(ExtractError::MissingField("current.weather_code"))?;
    let wind_speed = current
        .wind_speed_10m
        .ok_or(ExtractError::MissingField("current.wind_speed_10m"))?;
    let wind_direction = current
        .wind_direction_10m
        .ok_or(ExtractError::MissingField("current.wind_direction_10m"))?;

    Ok(CurrentConditions {
        weather_code: weather_code as i32,
        wind_speed,
        wind_direction: wind_direction as i32,
    })
}

/// One hour of the Open-Meteo hourly block
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    /// Local ISO 8601 time as sent, e.g. `2024-07-15T14:00`
    pub time: String,
    /// Temperature at 2 m in °C
    pub temperature: f64,
    /// WMO weather code
    pub weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    #[serde(default)]
    hourly: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Option<Vec<String>>,
    #[serde(default)]
    temperature_2m: Option<Vec<f64>>,
    #[serde(default)]
    weather_code: Option<Vec<f64>>,
}

/// Extracts the hourly parallel arrays into entries, in source order
///
/// If the arrays disagree in length only the common prefix is returned.
pub fn extract_hourly(body: &str) -> Result<Vec<HourlyEntry>, ExtractError> {
    let response: HourlyResponse = parse_object(body, "response")?;
    let hourly: HourlyBlock = nested_object(response.hourly, "hourly")?;

    let times = hourly
        .time
        .ok_or(ExtractError::MissingField("hourly.time"))?;
    let temperatures = hourly
        .temperature_2m
        .ok_or(ExtractError::MissingField("hourly.temperature_2m"))?;
    let codes = hourly
        .weather_code
        .ok_or(ExtractError::MissingField("hourly.weather_code"))?;

    let entries = times
        .into_iter()
        .zip(temperatures)
        .zip(codes)
        .map(|((time, temperature), code)| HourlyEntry {
            time,
            temperature,
            weather_code: code as i32,
        })
        .collect();

    Ok(entries)
}

/// Parses the leading number of a state string, C `atof` style
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"21.5 °C"` gives 21.5. Text with no numeric prefix, such as
/// `"unavailable"`, gives 0.0. This never fails.
pub fn lenient_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts if at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse().unwrap_or(0.0)
}
