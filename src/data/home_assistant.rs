//! Home Assistant REST API client
//!
//! Reads entity states and single historical values. Every call is one
//! authenticated GET; failures come back as `Reading::NoData`.

use std::fmt::Display;
use std::time::Duration;

use chrono::TimeZone;
use tracing::{debug, warn};

use super::extract::{extract_history_state, extract_state, lenient_float};
use super::fetch::{FetchError, Fetcher};
use super::window::{build_window, TimeWindow};
use super::Reading;
use crate::cli::HomeAssistantConfig;

/// Client for a single Home Assistant instance
#[derive(Debug, Clone)]
pub struct HomeAssistantClient {
    fetcher: Fetcher,
    base_url: String,
}

impl HomeAssistantClient {
    /// Creates a client for the configured instance
    pub fn new(config: &HomeAssistantConfig, timeout: Duration) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(timeout, Some(config.token.clone()))?;
        Ok(Self::with_fetcher(fetcher, &config.base_url))
    }

    /// Creates a client around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the state endpoint for `entity_id`
    pub fn state_url(&self, entity_id: &str) -> String {
        format!("{}/api/states/{}", self.base_url, entity_id)
    }

    /// URL of the history endpoint for `entity_id` over `window`
    pub fn history_url<Tz: TimeZone>(&self, entity_id: &str, window: &TimeWindow<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        format!(
            "{}/api/history/period/{}?end_time={}&filter_entity_id={}&minimal_response&no_attributes",
            self.base_url,
            window.encoded_start(),
            window.encoded_end(),
            entity_id
        )
    }

    /// Raw state text of an entity
    ///
    /// Display with [`STATE_TEXT_SENTINEL`](super::STATE_TEXT_SENTINEL) on `NoData`.
    pub async fn current_state(&self, entity_id: &str) -> Reading<String> {
        let body = match self.fetcher.fetch(&self.state_url(entity_id), true).await {
            Ok(body) => body,
            Err(e) => {
                warn!(entity = entity_id, error = %e, "no payload");
                return Reading::NoData;
            }
        };

        match extract_state(&body) {
            Ok(state) => Reading::Value(state),
            Err(e) => {
                warn!(entity = entity_id, error = %e, "state extraction failed");
                Reading::NoData
            }
        }
    }

    /// Entity state read as a number
    ///
    /// Non-numeric states such as `"unavailable"` read as 0.0 rather than
    /// `NoData`; see [`lenient_float`]. Display with
    /// [`STATE_SENTINEL`](super::STATE_SENTINEL) on `NoData`.
    pub async fn current_value(&self, entity_id: &str) -> Reading<f64> {
        let reading = self.current_state(entity_id).await.map(|state| lenient_float(&state));
        if let Reading::Value(value) = &reading {
            debug!("{} = {:.2}", entity_id, value);
        }
        reading
    }

    /// First recorded value of an entity in a window relative to now
    ///
    /// See [`TimeWindow::build`] for how `hours_shift` and
    /// `granularity_minutes` place the window. Display with
    /// [`HISTORY_SENTINEL`](super::HISTORY_SENTINEL) on `NoData`. A window
    /// too far back to represent is `NoData` without a request.
    pub async fn history_value(
        &self,
        entity_id: &str,
        hours_shift: u32,
        granularity_minutes: u32,
    ) -> Reading<f64> {
        let Some(window) = build_window(hours_shift, granularity_minutes) else {
            warn!(
                entity = entity_id,
                hours_shift,
                granularity_minutes,
                "history window out of range"
            );
            return Reading::NoData;
        };
        self.history_value_in(entity_id, &window).await
    }

    /// First recorded value of an entity in an explicit window
    pub async fn history_value_in<Tz: TimeZone>(
        &self,
        entity_id: &str,
        window: &TimeWindow<Tz>,
    ) -> Reading<f64>
    where
        Tz::Offset: Display,
    {
        let url = self.history_url(entity_id, window);
        let body = match self.fetcher.fetch(&url, true).await {
            Ok(body) => body,
            Err(e) => {
                warn!(entity = entity_id, error = %e, "no history payload");
                return Reading::NoData;
            }
        };

        match extract_history_state(&body) {
            Ok(state) => Reading::Value(lenient_float(&state)),
            Err(e) => {
                warn!(entity = entity_id, error = %e, "history extraction failed");
                Reading::NoData
            }
        }
    }
}
