//! Query windows for the Home Assistant history endpoint

use std::fmt::Display;

use chrono::{DateTime, Duration, Local, TimeZone};

/// Timestamp layout the history endpoint accepts, e.g. `2024-07-15T14:00:00+0200`
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// A `[start, end]` range for a history query
#[derive(Debug, Clone)]
pub struct TimeWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Window ending `hours_shift * granularity_minutes` minutes before the current local time
///
/// See [`TimeWindow::build`] for the arithmetic. `None` if the window falls
/// outside the representable date range.
pub fn build_window(hours_shift: u32, granularity_minutes: u32) -> Option<TimeWindow<Local>> {
    TimeWindow::build(Local::now(), hours_shift, granularity_minutes)
}

impl<Tz: TimeZone> TimeWindow<Tz>
where
    Tz::Offset: Display,
{
    /// Builds the window relative to `now`
    ///
    /// `end = now - hours_shift * granularity_minutes` minutes and
    /// `start = end - granularity_minutes` minutes. The shift is counted in
    /// granularity steps, not in hours.
    ///
    /// Returns `None` when the shift overflows or either bound lands outside
    /// the range chrono can represent.
    pub fn build(now: DateTime<Tz>, hours_shift: u32, granularity_minutes: u32) -> Option<Self> {
        let shift = i64::from(hours_shift)
            .checked_mul(i64::from(granularity_minutes))
            .and_then(Duration::try_minutes)?;
        let width = Duration::try_minutes(i64::from(granularity_minutes))?;

        let end = now.checked_sub_signed(shift)?;
        let start = end.clone().checked_sub_signed(width)?;

        Some(Self { start, end })
    }

    /// Start rendered in [`WIRE_FORMAT`] and made safe for a URL
    pub fn encoded_start(&self) -> String {
        encode_timestamp(&self.start.format(WIRE_FORMAT).to_string())
    }

    /// End rendered in [`WIRE_FORMAT`] and made safe for a URL
    pub fn encoded_end(&self) -> String {
        encode_timestamp(&self.end.format(WIRE_FORMAT).to_string())
    }
}

/// Escapes the two reserved characters a wire timestamp can contain
///
/// Only `:` and `+` are handled; this is not a general URL encoder.
pub fn encode_timestamp(timestamp: &str) -> String {
    timestamp.replace(':', "%3A").replace('+', "%2B")
}
