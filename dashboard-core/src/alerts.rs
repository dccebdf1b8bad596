use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{CurrentConditions, PollutionSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Alert {
    fn new(title: &str, message: String, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            message,
            severity,
        }
    }
}

/// Alert trigger points. Defaults are the dashboard's fixed constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Strictly above this fires "Extreme Heat".
    pub extreme_heat_c: f64,
    /// Strictly below this fires "Cold Weather".
    pub cold_c: f64,
    pub high_wind_mps: f64,
    pub high_humidity_pct: f64,
    /// At or above this AQI fires "Poor Air Quality".
    pub poor_aqi: i64,
    /// Exactly this AQI fires "Moderate Air Quality".
    pub moderate_aqi: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            extreme_heat_c: 35.0,
            cold_c: 5.0,
            high_wind_mps: 15.0,
            high_humidity_pct: 85.0,
            poor_aqi: 4,
            moderate_aqi: 3,
        }
    }
}

/// Evaluate every rule in a fixed order: temperature, wind, humidity, air
/// quality. Rules are independent; any subset may fire.
pub fn generate_alerts(
    current: &CurrentConditions,
    pollution: Option<&PollutionSample>,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let temp = current.temperature_c;
    if temp > thresholds.extreme_heat_c {
        alerts.push(Alert::new(
            "Extreme Heat",
            format!("Temperature is {temp}°C. Stay hydrated and avoid outdoor activities."),
            Severity::Danger,
        ));
    } else if temp < thresholds.cold_c {
        alerts.push(Alert::new(
            "Cold Weather",
            format!("Temperature is {temp}°C. Dress warmly and protect against frostbite."),
            Severity::Warning,
        ));
    }

    let wind = current.wind_speed_mps;
    if wind > thresholds.high_wind_mps {
        alerts.push(Alert::new(
            "High Wind",
            format!("Wind speed is {wind} m/s. Secure loose objects."),
            Severity::Warning,
        ));
    }

    let humidity = current.humidity_pct;
    if f64::from(humidity) > thresholds.high_humidity_pct {
        alerts.push(Alert::new(
            "High Humidity",
            format!("Humidity is {humidity}%. May feel uncomfortable."),
            Severity::Warning,
        ));
    }

    if let Some(poll) = pollution {
        if poll.aqi >= thresholds.poor_aqi {
            alerts.push(Alert::new(
                "Poor Air Quality",
                "Air quality is poor. Limit outdoor exposure and wear a mask.".to_string(),
                Severity::Danger,
            ));
        } else if poll.aqi == thresholds.moderate_aqi {
            alerts.push(Alert::new(
                "Moderate Air Quality",
                "Air quality is moderate. \
                 Sensitive groups should limit prolonged outdoor activities."
                    .to_string(),
                Severity::Warning,
            ));
        }
    }

    alerts
}
