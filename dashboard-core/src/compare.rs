//! Multi-city comparison rows and their 0–100 radar normalization.

use serde::{Deserialize, Serialize};

use crate::{
    model::{ConditionCategory, WeatherBundle},
    units::TemperatureUnit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    Aqi,
}

impl Dimension {
    pub const fn all() -> &'static [Dimension] {
        &[
            Dimension::Temperature,
            Dimension::Humidity,
            Dimension::Pressure,
            Dimension::WindSpeed,
            Dimension::Aqi,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Temperature => "Temperature",
            Dimension::Humidity => "Humidity",
            Dimension::Pressure => "Pressure",
            Dimension::WindSpeed => "Wind Speed",
            Dimension::Aqi => "AQI",
        }
    }

    /// Fixed `(min, max)` scale. Temperature follows the display unit.
    pub fn range(&self, unit: TemperatureUnit) -> (f64, f64) {
        match (self, unit) {
            (Dimension::Temperature, TemperatureUnit::Celsius) => (0.0, 50.0),
            (Dimension::Temperature, TemperatureUnit::Fahrenheit) => (32.0, 122.0),
            (Dimension::Humidity, _) => (0.0, 100.0),
            (Dimension::Pressure, _) => (950.0, 1050.0),
            (Dimension::WindSpeed, _) => (0.0, 20.0),
            (Dimension::Aqi, _) => (1.0, 5.0),
        }
    }
}

/// Clamp into `[min, max]` and rescale to 0–100.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    (clamped - min) / (max - min) * 100.0
}

/// One compared city. Temperatures are in the display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub aqi: Option<i64>,
    pub condition: ConditionCategory,
    pub temperature_score: f64,
    pub humidity_score: f64,
    pub pressure_score: f64,
    pub wind_speed_score: f64,
    pub aqi_score: f64,
}

impl ComparisonRow {
    pub fn from_bundle(city: &str, bundle: &WeatherBundle, unit: TemperatureUnit) -> Self {
        let cw = &bundle.current;
        let temperature = unit.convert(cw.temperature_c);
        let aqi = bundle.pollution.as_ref().map(|p| p.aqi);

        let score = |dim: Dimension, value: f64| {
            let (min, max) = dim.range(unit);
            normalize(value, min, max)
        };

        Self {
            city: title_case(city),
            temperature,
            feels_like: unit.convert(cw.feels_like_c),
            humidity_pct: cw.humidity_pct,
            pressure_hpa: cw.pressure_hpa,
            wind_speed_mps: cw.wind_speed_mps,
            aqi,
            condition: cw.condition.clone(),
            temperature_score: score(Dimension::Temperature, temperature),
            humidity_score: score(Dimension::Humidity, f64::from(cw.humidity_pct)),
            pressure_score: score(Dimension::Pressure, cw.pressure_hpa),
            wind_speed_score: score(Dimension::WindSpeed, cw.wind_speed_mps),
            // No pollution data still gets a point on the radar.
            aqi_score: aqi.map_or(0.0, |v| score(Dimension::Aqi, v as f64)),
        }
    }

    pub fn score(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Temperature => self.temperature_score,
            Dimension::Humidity => self.humidity_score,
            Dimension::Pressure => self.pressure_score,
            Dimension::WindSpeed => self.wind_speed_score,
            Dimension::Aqi => self.aqi_score,
        }
    }
}

/// Result of comparing several cities; one failure never hides the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub unit: TemperatureUnit,
    pub rows: Vec<ComparisonRow>,
    pub failures: Vec<CityFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityFailure {
    pub city: String,
    pub reason: String,
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
