use crate::{
    error::FetchError,
    model::{ForecastEntry, WeatherRecord},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions and the 5-day/3-hour forecast for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherRecord, FetchError>;

    /// Raw 3-hour slots in chronological order.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError>;
}

