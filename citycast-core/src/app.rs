//! The weather application: search controller, fetch orchestrator and
//! history actions behind a single command surface.
//!
//! Front ends call [`WeatherApp::submit_search`] with raw input and observe
//! the result through their [`RenderSink`].

use crate::{
    config::Config,
    error::SearchError,
    forecast,
    history::{KeyValueStore, RecentSearches},
    model::{ForecastEntry, WeatherRecord},
    provider::WeatherProvider,
    render::{self, Controls, RenderSink},
    search::validate_city,
};

pub const CLEAR_HISTORY_PROMPT: &str = "Clear all recent searches?";

/// What the display currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Welcome,
    Loading,
    Success,
    Error,
}

#[derive(Debug)]
pub struct WeatherApp<P, S, R> {
    config: Config,
    provider: P,
    history: RecentSearches<S>,
    sink: R,
    state: DisplayState,
}

impl<P, S, R> WeatherApp<P, S, R>
where
    P: WeatherProvider,
    S: KeyValueStore,
    R: RenderSink,
{
    pub fn new(config: Config, provider: P, store: S, sink: R) -> Self {
        Self {
            config,
            provider,
            history: RecentSearches::load(store),
            sink,
            state: DisplayState::Welcome,
        }
    }

    /// Initial view: re-run the last searched city if there is one,
    /// otherwise show the welcome message.
    pub async fn start(&mut self) -> Option<Result<(), SearchError>> {
        match self.history.last_city() {
            Some(city) => Some(self.submit_search(&city).await),
            None => {
                self.show_welcome();
                None
            }
        }
    }

    pub fn show_welcome(&mut self) {
        self.sink.replace(render::welcome());
        self.state = DisplayState::Welcome;
    }

    /// Validate raw input and, if acceptable, run a search.
    pub async fn submit_search(&mut self, input: &str) -> Result<(), SearchError> {
        let city = match validate_city(input) {
            Ok(city) => city.to_string(),
            Err(e) => {
                tracing::debug!(input, "rejected search input: {e}");
                self.show_error(e.user_message());
                return Err(e.into());
            }
        };

        self.search(&city).await
    }

    /// Search for the remembered city at `index` (0 = most recent).
    pub async fn search_recent(&mut self, index: usize) -> Option<Result<(), SearchError>> {
        let city = self.history.cities().get(index)?.clone();
        Some(self.submit_search(&city).await)
    }

    /// Clear recent searches after the user confirms; returns whether it happened.
    pub fn clear_history(&mut self) -> bool {
        let cleared = clear_history(&mut self.history, &mut self.sink);
        if cleared {
            self.state = DisplayState::Welcome;
        }
        cleared
    }

    pub fn recent_cities(&self) -> &[String] {
        self.history.cities()
    }

    pub fn last_city(&self) -> Option<String> {
        self.history.last_city()
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    async fn search(&mut self, city: &str) -> Result<(), SearchError> {
        self.sink.replace(render::loading());
        self.state = DisplayState::Loading;
        self.sink.set_controls(Controls::Busy);

        let outcome = self.fetch_and_render(city).await;

        if let Err(e) = &outcome {
            tracing::warn!(city, "search failed: {e}");
            self.show_error(e.user_message());
        }

        // Runs on every path so the user can always search again.
        self.sink.set_controls(Controls::Ready);
        outcome
    }

    async fn fetch_and_render(&mut self, city: &str) -> Result<(), SearchError> {
        let (current, entries) = fetch_both(&self.provider, city).await?;

        self.sink.replace(render::weather(&current, &self.config));
        let days = forecast::select_daily(&entries);
        self.sink.append(render::forecast(&days, &self.config));
        self.state = DisplayState::Success;
        tracing::info!(city = %current.city, days = days.len(), "rendered weather");

        if let Err(e) = self.history.record(city) {
            tracing::warn!("Failed to save search history: {e:#}");
        }

        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        self.sink.replace(render::error(message));
        self.state = DisplayState::Error;
    }
}

/// Ask for confirmation, then forget recent searches and show the welcome
/// fragment. Usable without a provider, so history can be cleared before
/// an API key is configured.
pub fn clear_history<S, R>(history: &mut RecentSearches<S>, sink: &mut R) -> bool
where
    S: KeyValueStore,
    R: RenderSink,
{
    if !sink.confirm(CLEAR_HISTORY_PROMPT) {
        return false;
    }

    if let Err(e) = history.clear() {
        tracing::warn!("Failed to clear search history: {e:#}");
    }
    sink.replace(render::welcome());
    true
}

/// Issue both requests concurrently. The first failure wins: the other
/// request is dropped and whatever it would have returned is discarded.
pub async fn fetch_both<P: WeatherProvider + ?Sized>(
    provider: &P,
    city: &str,
) -> Result<(WeatherRecord, Vec<ForecastEntry>), SearchError> {
    let (current, entries) = tokio::try_join!(provider.current(city), provider.forecast(city))?;
    Ok((current, entries))
}
