//! Core library for the `citycast` weather client.
//!
//! This crate defines:
//! - Configuration (API key, endpoints, units)
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - Forecast reduction, rendering and the recent-search history
//! - [`WeatherApp`], which ties them together behind `submit_search`
//!
//! It is used by `citycast-cli`, but any front end that implements
//! [`RenderSink`] can drive it.

pub mod app;
pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod provider;
pub mod render;
pub mod search;

pub use app::{DisplayState, WeatherApp};
pub use config::Config;
pub use error::{FetchError, SearchError, ValidationError};
pub use history::{FileStore, KeyValueStore, MemoryStore, RecentSearches};
pub use model::{ForecastEntry, Units, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use render::{Controls, Fragment, RenderSink};
