//! Noon-sample reduction of the 3-hour forecast.
//!
//! The provider returns up to 40 slots covering five days. One reading per
//! day is approximated by keeping the slot stamped `12:00:00`. Near the
//! window edges that can yield fewer than five days; the result is not padded.

use crate::model::ForecastEntry;

pub const NOON_MARKER: &str = "12:00:00";
pub const MAX_FORECAST_DAYS: usize = 5;

/// Keep the first five noon slots, in provider order.
pub fn select_daily(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    entries
        .iter()
        .filter(|e| e.timestamp_text.contains(NOON_MARKER))
        .take(MAX_FORECAST_DAYS)
        .cloned()
        .collect()
}
