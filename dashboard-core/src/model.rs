use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Provider's `weather[0].main` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Mist,
    Other(String),
}

impl ConditionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Other(s) => s,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ConditionCategory::Clear => "☀️",
            ConditionCategory::Clouds => "☁️",
            ConditionCategory::Rain => "🌧️",
            ConditionCategory::Thunderstorm => "⛈️",
            ConditionCategory::Mist => "🌫️",
            ConditionCategory::Other(_) => "🌦️",
        }
    }
}

impl From<&str> for ConditionCategory {
    fn from(value: &str) -> Self {
        match value {
            "Clear" => ConditionCategory::Clear,
            "Clouds" => ConditionCategory::Clouds,
            "Rain" => ConditionCategory::Rain,
            "Thunderstorm" => ConditionCategory::Thunderstorm,
            "Mist" => ConditionCategory::Mist,
            other => ConditionCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for ConditionCategory {
    fn from(value: String) -> Self {
        ConditionCategory::from(value.as_str())
    }
}

impl From<ConditionCategory> for String {
    fn from(value: ConditionCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current observation for a city. Temperatures in °C, wind in m/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: Option<f64>,
    pub condition: ConditionCategory,
    pub description: String,
    pub coordinates: Coordinates,
    pub observation_time: DateTime<Utc>,
}

/// One 3-hour step of the provider forecast, as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub cloud_cover_pct: u8,
    pub condition: ConditionCategory,
    pub description: String,
}

/// Chronological, never-empty forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Rejects an empty list: an empty forecast is a malformed bundle.
    pub fn new(points: Vec<ForecastPoint>) -> Result<Self, FetchError> {
        if points.is_empty() {
            return Err(FetchError::MalformedBundle(
                "forecast series contained no samples".to_string(),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Provider-defined AQI category for the index values 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    pub fn from_index(aqi: i64) -> Option<Self> {
        match aqi {
            1 => Some(AqiLevel::Good),
            2 => Some(AqiLevel::Fair),
            3 => Some(AqiLevel::Moderate),
            4 => Some(AqiLevel::Poor),
            5 => Some(AqiLevel::VeryPoor),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }
}

/// Label for an AQI value; anything outside 1..=5 is "Unknown".
pub fn aqi_label(aqi: i64) -> &'static str {
    AqiLevel::from_index(aqi).map_or("Unknown", |level| level.label())
}

/// Label for an optional AQI; absence displays as "N/A".
pub fn aqi_display(aqi: Option<i64>) -> &'static str {
    aqi.map_or("N/A", aqi_label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    Co,
    No2,
    O3,
    So2,
    Pm2_5,
    Pm10,
}

impl Pollutant {
    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Co,
            Pollutant::No2,
            Pollutant::O3,
            Pollutant::So2,
            Pollutant::Pm2_5,
            Pollutant::Pm10,
        ]
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
            Pollutant::So2 => "SO₂",
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
        }
    }

    /// Key under `components` in the air pollution payload.
    pub fn provider_key(&self) -> &'static str {
        match self {
            Pollutant::Co => "co",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::So2 => "so2",
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Pm10 => "pm10",
        }
    }

    /// Approximate WHO guideline, μg/m³.
    pub fn safe_limit(&self) -> f64 {
        match self {
            Pollutant::Co => 10_000.0,
            Pollutant::No2 => 200.0,
            Pollutant::O3 => 180.0,
            Pollutant::So2 => 350.0,
            Pollutant::Pm2_5 => 25.0,
            Pollutant::Pm10 => 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionSample {
    /// Provider index, normally 1..=5. Kept as sent so odd values still
    /// label as "Unknown".
    pub aqi: i64,
    /// Concentrations in μg/m³.
    pub components: BTreeMap<Pollutant, f64>,
}

impl PollutionSample {
    pub fn label(&self) -> &'static str {
        aqi_label(self.aqi)
    }

    pub fn concentration(&self, pollutant: Pollutant) -> f64 {
        self.components.get(&pollutant).copied().unwrap_or(0.0)
    }
}

/// Everything fetched for one city at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherBundle {
    pub city: String,
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
    pub pollution: Option<PollutionSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_labels_in_range() {
        assert_eq!(aqi_label(1), "Good");
        assert_eq!(aqi_label(2), "Fair");
        assert_eq!(aqi_label(3), "Moderate");
        assert_eq!(aqi_label(4), "Poor");
        assert_eq!(aqi_label(5), "Very Poor");
    }

    #[test]
    fn aqi_out_of_range_is_unknown() {
        for v in [-1, 0, 6, 42, 255, 1_000] {
            assert_eq!(aqi_label(v), "Unknown");
        }
        assert_eq!(aqi_display(None), "N/A");
        assert_eq!(aqi_display(Some(9)), "Unknown");
    }

    #[test]
    fn condition_category_parses_known_and_other() {
        assert_eq!(ConditionCategory::from("Clear"), ConditionCategory::Clear);
        assert_eq!(ConditionCategory::from("Mist"), ConditionCategory::Mist);
        let snow = ConditionCategory::from("Snow");
        assert_eq!(snow, ConditionCategory::Other("Snow".to_string()));
        assert_eq!(snow.as_str(), "Snow");
    }

    #[test]
    fn condition_category_serializes_as_plain_string() {
        let json = serde_json::to_string(&ConditionCategory::Clouds).unwrap();
        assert_eq!(json, "\"Clouds\"");
        let back: ConditionCategory = serde_json::from_str("\"Drizzle\"").unwrap();
        assert_eq!(back, ConditionCategory::Other("Drizzle".into()));
    }

    #[test]
    fn empty_forecast_series_is_malformed() {
        let err = ForecastSeries::new(Vec::new()).unwrap_err();
        assert!(matches!(err, FetchError::MalformedBundle(_)));
    }

    #[test]
    fn missing_component_reads_as_zero() {
        let sample = PollutionSample {
            aqi: 2,
            components: BTreeMap::from([(Pollutant::Pm10, 12.5)]),
        };
        assert_eq!(sample.concentration(Pollutant::Pm10), 12.5);
        assert_eq!(sample.concentration(Pollutant::Co), 0.0);
        assert_eq!(sample.label(), "Fair");
    }
}
