use serde::{Deserialize, Serialize};

/// Unit system sent as the `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    /// Suffix appended to rendered temperatures.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions for one city, recreated on every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: i32,
    pub description: String,
    pub icon: String,
}

/// One 3-hour slot of the 5-day forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Epoch seconds.
    pub timestamp: i64,
    /// Provider's text form of the slot, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp_text: String,
    pub temperature: i32,
    pub description: String,
    pub icon: String,
}

/// Round a provider temperature to the integer shown to the user.
/// Halves round up, towards positive infinity.
pub fn round_temperature(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_temperature(21.5), 22);
        assert_eq!(round_temperature(21.49), 21);
        assert_eq!(round_temperature(-2.5), -2);
        assert_eq!(round_temperature(-3.5), -3);
        assert_eq!(round_temperature(-0.5), 0);
        assert_eq!(round_temperature(-0.4), 0);
        assert_eq!(round_temperature(-2.51), -3);
    }

    #[test]
    fn units_parse_from_lowercase() {
        let units: Units = serde_json::from_str("\"imperial\"").expect("valid units");
        assert_eq!(units, Units::Imperial);
        assert_eq!(Units::default().as_str(), "metric");
        assert_eq!(Units::Metric.temperature_suffix(), "°C");
    }
}
