//! Display fragments and the sink they are written to.
//!
//! Rendering is a pure mapping from records to [`Fragment`]s. A front end
//! implements [`RenderSink`] to put them on screen.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::{
    config::Config,
    model::{ForecastEntry, Units, WeatherRecord},
};

pub const SEARCH_LABEL: &str = "🔍 Search";
pub const BUSY_LABEL: &str = "Searching...";

/// State of the input field and search button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Input disabled, button shows [`BUSY_LABEL`].
    Busy,
    /// Input enabled, cleared and focused; button shows [`SEARCH_LABEL`].
    Ready,
}

impl Controls {
    pub fn button_label(&self) -> &'static str {
        match self {
            Controls::Busy => BUSY_LABEL,
            Controls::Ready => SEARCH_LABEL,
        }
    }

    pub fn input_enabled(&self) -> bool {
        matches!(self, Controls::Ready)
    }
}

/// Where fragments and control changes go.
pub trait RenderSink {
    /// Replace whatever is currently displayed.
    fn replace(&mut self, fragment: Fragment);

    /// Add below the current content.
    fn append(&mut self, fragment: Fragment);

    fn set_controls(&mut self, controls: Controls);

    /// Ask the user a yes/no question.
    fn confirm(&mut self, question: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCard {
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    pub day: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Welcome,
    Loading,
    Error(String),
    Weather(WeatherCard),
    Forecast(Vec<ForecastCard>),
}

pub fn welcome() -> Fragment {
    Fragment::Welcome
}

pub fn loading() -> Fragment {
    Fragment::Loading
}

pub fn error(message: impl Into<String>) -> Fragment {
    Fragment::Error(message.into())
}

pub fn weather(record: &WeatherRecord, config: &Config) -> Fragment {
    Fragment::Weather(WeatherCard {
        city: record.city.clone(),
        temperature: format_temperature(record.temperature, config.units),
        description: record.description.clone(),
        icon_url: config.icon_url(&record.icon),
    })
}

/// Forecast strip with weekday names in the viewer's time zone.
pub fn forecast(days: &[ForecastEntry], config: &Config) -> Fragment {
    forecast_in(days, config, &Local)
}

pub fn forecast_in<Tz: TimeZone>(days: &[ForecastEntry], config: &Config, tz: &Tz) -> Fragment
where
    Tz::Offset: fmt::Display,
{
    let cards = days
        .iter()
        .map(|day| ForecastCard {
            day: weekday_name(day.timestamp, tz),
            temperature: format_temperature(day.temperature, config.units),
            description: day.description.clone(),
            icon_url: config.icon_url(&day.icon),
        })
        .collect();

    Fragment::Forecast(cards)
}

fn format_temperature(value: i32, units: Units) -> String {
    format!("{value}{}", units.temperature_suffix())
}

fn weekday_name<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(tz).format("%a").to_string())
        .unwrap_or_else(|| "?".to_string())
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Welcome => {
                writeln!(f, "👋 Welcome!")?;
                writeln!(f, "Enter a city name to get current weather and a 5-day forecast.")
            }
            Fragment::Loading => writeln!(f, "Fetching weather data..."),
            Fragment::Error(message) => writeln!(f, "❌ {message}"),
            Fragment::Weather(card) => {
                writeln!(f, "{}", card.city)?;
                writeln!(f, "  {}  {}", card.temperature, card.description)?;
                writeln!(f, "  {}", card.icon_url)
            }
            Fragment::Forecast(cards) => {
                writeln!(f, "5-Day Forecast")?;
                for card in cards {
                    writeln!(
                        f,
                        "  {:<4} {:>6}  {:<24} {}",
                        card.day, card.temperature, card.description, card.icon_url
                    )?;
                }
                Ok(())
            }
        }
    }
}
