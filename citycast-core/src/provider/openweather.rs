use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::FetchError,
    model::{ForecastEntry, Units, WeatherRecord, round_temperature},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    weather_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Build a provider from config; fails if no API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            api_key,
            units: config.units,
            weather_url: config.endpoints.weather_url.clone(),
            forecast_url: config.endpoints.forecast_url.clone(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        city: &str,
        what: &str,
    ) -> Result<T, FetchError> {
        tracing::debug!(url, city, "requesting OpenWeather {what}");

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::warn!("OpenWeather {what} request failed: {e}"))?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, "OpenWeather {what} request rejected");
            return Err(rejected(status, res.text().await));
        }

        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Failed to parse OpenWeather {what} JSON: {e}");
            FetchError::Decode(e)
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwCurrentResponse> for WeatherRecord {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            FetchError::Malformed("current weather response has no conditions".to_string())
        })?;

        Ok(WeatherRecord {
            city: parsed.name,
            temperature: round_temperature(parsed.main.temp),
            description: condition.description,
            icon: condition.icon,
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = FetchError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let condition = entry.weather.into_iter().next().ok_or_else(|| {
            FetchError::Malformed(format!("forecast slot {} has no conditions", entry.dt_txt))
        })?;

        Ok(ForecastEntry {
            timestamp: entry.dt,
            timestamp_text: entry.dt_txt,
            temperature: round_temperature(entry.main.temp),
            description: condition.description,
            icon: condition.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let parsed: OwCurrentResponse =
            self.get_json(&self.weather_url, city, "current weather").await?;
        parsed.try_into()
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
        let parsed: OwForecastResponse =
            self.get_json(&self.forecast_url, city, "forecast").await?;
        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

/// Error for a non-success status. The status alone decides the
/// classification; an unreadable body is reported as empty.
fn rejected(status: StatusCode, body: reqwest::Result<String>) -> FetchError {
    let body = body.unwrap_or_else(|e| {
        tracing::debug!("Failed to read rejected response body: {e}");
        String::new()
    });

    FetchError::Status { status: status.as_u16(), body: truncate_body(&body) }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Endpoints, error::SearchError};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        let mut cfg = Config::default();
        cfg.set_api_key("TEST_KEY".into());
        cfg.endpoints = Endpoints {
            weather_url: format!("{}/weather", server.uri()),
            forecast_url: format!("{}/forecast", server.uri()),
            ..Endpoints::default()
        };
        OpenWeatherProvider::from_config(&cfg).expect("provider")
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = OpenWeatherProvider::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[tokio::test]
    async fn current_sends_city_key_and_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "São Paulo"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "São Paulo",
                "main": { "temp": 24.6, "humidity": 70 },
                "weather": [{ "id": 800, "description": "clear sky", "icon": "01d" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = provider_for(&server).current("São Paulo").await.expect("weather");
        assert_eq!(
            record,
            WeatherRecord {
                city: "São Paulo".into(),
                temperature: 25,
                description: "clear sky".into(),
                icon: "01d".into(),
            }
        );
    }

    #[tokio::test]
    async fn not_found_is_reported_as_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).current("Atlantis").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn server_error_is_not_a_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = provider_for(&server).forecast("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, ref body } if body == "maintenance"));
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).current("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_conditions_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": { "temp": 10.0 },
                "weather": []
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).current("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn forecast_keeps_api_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "list": [
                    {
                        "dt": 1700038800,
                        "dt_txt": "2023-11-15 09:00:00",
                        "main": { "temp": -1.2 },
                        "weather": [{ "description": "light snow", "icon": "13d" }]
                    },
                    {
                        "dt": 1700049600,
                        "dt_txt": "2023-11-15 12:00:00",
                        "main": { "temp": 0.6 },
                        "weather": [{ "description": "overcast clouds", "icon": "04d" }]
                    }
                ],
                "city": { "name": "Oslo", "country": "NO" }
            })))
            .mount(&server)
            .await;

        let entries = provider_for(&server).forecast("Oslo").await.expect("forecast");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp_text, "2023-11-15 09:00:00");
        assert_eq!(entries[0].temperature, -1);
        assert_eq!(entries[1].timestamp, 1700049600);
        assert_eq!(entries[1].temperature, 1);
        assert_eq!(entries[1].icon, "04d");
    }

    #[tokio::test]
    async fn slow_response_times_out_as_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "name": "Paris",
                        "main": { "temp": 10.0 },
                        "weather": [{ "description": "mist", "icon": "50d" }]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut cfg = Config::default();
        cfg.set_api_key("TEST_KEY".into());
        cfg.request_timeout_secs = 1;
        cfg.endpoints.weather_url = format!("{}/weather", server.uri());
        let provider = OpenWeatherProvider::from_config(&cfg).expect("provider");

        let err = provider.current("Paris").await.unwrap_err();
        assert!(matches!(&err, FetchError::Request(e) if e.is_timeout()), "got {err:?}");
        assert!(matches!(SearchError::from(err), SearchError::Transient(_)));
    }

    /// A local address nothing listens on.
    fn closed_addr() -> std::net::SocketAddr {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    }

    async fn connection_error() -> reqwest::Error {
        reqwest::get(format!("http://{}/weather", closed_addr())).await.unwrap_err()
    }

    #[tokio::test]
    async fn unreachable_host_is_transient() {
        let addr = closed_addr();

        let mut cfg = Config::default();
        cfg.set_api_key("TEST_KEY".into());
        cfg.endpoints.weather_url = format!("http://{addr}/weather");
        cfg.endpoints.forecast_url = format!("http://{addr}/forecast");
        let provider = OpenWeatherProvider::from_config(&cfg).expect("provider");

        let err = provider.forecast("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)), "got {err:?}");
        assert!(matches!(SearchError::from(err), SearchError::Transient(_)));
    }

    #[tokio::test]
    async fn not_found_survives_an_unreadable_body() {
        let err = rejected(StatusCode::NOT_FOUND, Err(connection_error().await));

        assert!(err.is_not_found());
        assert!(matches!(err, FetchError::Status { status: 404, ref body } if body.is_empty()));
        assert!(matches!(SearchError::from(err), SearchError::NotFound));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
