use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::{collections::HashMap, time::Duration};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::FetchError,
    model::{
        ConditionCategory, Coordinates, CurrentConditions, ForecastPoint, ForecastSeries,
        Pollutant, PollutionSample, WeatherBundle,
    },
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `base_url` is scheme + host, e.g. `https://api.openweathermap.org`.
    pub fn with_options(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_body(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("GET {path}: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            FetchError::Transport(format!("Failed to read {path} response body: {e}"))
        })?;

        debug!(%status, path, bytes = body.len(), "OpenWeather response");
        Ok((status, body))
    }

    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        let (_, body) = self
            .get_body("/data/2.5/weather", &[("q", city), ("units", "metric")])
            .await?;

        let status: OwStatus = parse(&body, "current weather")?;
        if !status.is_ok() {
            return Err(FetchError::CityNotFound {
                city: city.to_string(),
                message: status.message_or_body(&body),
            });
        }

        let parsed: OwCurrentResponse = parse(&body, "current weather")?;
        let (condition, description) = first_weather(&parsed.weather);

        Ok(CurrentConditions {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            wind_direction_deg: parsed.wind.deg,
            condition,
            description,
            coordinates: Coordinates {
                lat: parsed.coord.lat,
                lon: parsed.coord.lon,
            },
            observation_time: parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now),
        })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastSeries, FetchError> {
        let (_, body) = self
            .get_body("/data/2.5/forecast", &[("q", city), ("units", "metric")])
            .await?;

        let status: OwStatus = parse(&body, "forecast")?;
        if !status.is_ok() {
            return Err(FetchError::MalformedBundle(format!(
                "forecast request was rejected: {}",
                status.message_or_body(&body)
            )));
        }

        let parsed: OwForecastResponse = parse(&body, "forecast")?;

        let points = parsed
            .list
            .into_iter()
            .map(|entry| {
                let time = unix_to_utc(entry.dt).ok_or_else(|| {
                    FetchError::Parse(format!("forecast timestamp {} is out of range", entry.dt))
                })?;
                let (condition, description) = first_weather(&entry.weather);

                Ok(ForecastPoint {
                    time,
                    temperature_c: entry.main.temp,
                    feels_like_c: entry.main.feels_like,
                    humidity_pct: entry.main.humidity,
                    pressure_hpa: entry.main.pressure,
                    wind_speed_mps: entry.wind.speed,
                    cloud_cover_pct: entry.clouds.map_or(0, |c| c.all),
                    condition,
                    description,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        ForecastSeries::new(points)
    }

    /// An empty `list` means no data for these coordinates. A rejected
    /// request is a provider failure, not missing data.
    async fn fetch_pollution(
        &self,
        coord: Coordinates,
    ) -> Result<Option<PollutionSample>, FetchError> {
        let lat = coord.lat.to_string();
        let lon = coord.lon.to_string();
        let (status, body) = self
            .get_body(
                "/data/2.5/air_pollution",
                &[("lat", lat.as_str()), ("lon", lon.as_str())],
            )
            .await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwStatus>(&body)
                .map_or_else(|_| truncate_body(&body), |s| s.message_or_body(&body));
            return Err(FetchError::Transport(format!(
                "air pollution request failed with {status}: {message}"
            )));
        }

        let parsed: OwPollutionResponse = parse(&body, "air pollution")?;

        let Some(entry) = parsed.list.into_iter().next() else {
            return Ok(None);
        };

        let components = Pollutant::all()
            .iter()
            .filter_map(|p| entry.components.get(p.provider_key()).map(|v| (*p, *v)))
            .collect();

        Ok(Some(PollutionSample {
            aqi: entry.main.aqi,
            components,
        }))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(city = %city))]
    async fn fetch_bundle(&self, city: &str) -> Result<WeatherBundle, FetchError> {
        let city = city.trim();

        let current = match self.fetch_current(city).await {
            Ok(current) => current,
            Err(err) => {
                warn!(error = %err, "Current conditions unavailable");
                return Err(err);
            }
        };

        let forecast = self.fetch_forecast(city).await?;
        let pollution = self.fetch_pollution(current.coordinates).await?;

        if pollution.is_none() {
            info!("No air pollution data for coordinates");
        }
        info!(samples = forecast.len(), "Fetched weather bundle");

        Ok(WeatherBundle {
            city: city.to_string(),
            current,
            forecast,
            pollution,
        })
    }
}

/// Common envelope: `cod` is a number on success and a string on errors.
#[derive(Debug, Deserialize)]
struct OwStatus {
    #[serde(default)]
    cod: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl OwStatus {
    fn is_ok(&self) -> bool {
        match &self.cod {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(200),
            Some(serde_json::Value::String(s)) => s == "200",
            _ => false,
        }
    }

    /// Provider's error message, or the raw body when it sent none.
    fn message_or_body(&self, body: &str) -> String {
        match &self.message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => truncate_body(body),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dt: Option<i64>,
    coord: OwCoord,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: Option<OwClouds>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionEntry {
    main: OwAqi,
    #[serde(default)]
    components: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    #[serde(default)]
    list: Vec<OwPollutionEntry>,
}

fn parse<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| {
        FetchError::Parse(format!("{what} JSON: {e} (body: {})", truncate_body(body)))
    })
}

fn first_weather(weather: &[OwWeather]) -> (ConditionCategory, String) {
    weather.first().map_or_else(
        || (ConditionCategory::Other("Unknown".to_string()), String::new()),
        |w| (ConditionCategory::from(w.main.as_str()), w.description.clone()),
    )
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_numeric_and_string_200() {
        let ok: OwStatus = serde_json::from_str(r#"{"cod":200}"#).unwrap();
        assert!(ok.is_ok());
        let ok: OwStatus = serde_json::from_str(r#"{"cod":"200","list":[]}"#).unwrap();
        assert!(ok.is_ok());
        let missing: OwStatus =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert!(!missing.is_ok());
        assert_eq!(missing.message_or_body("{}"), "city not found");
    }

    #[test]
    fn empty_weather_array_is_unknown_condition() {
        let (cond, desc) = first_weather(&[]);
        assert_eq!(cond, ConditionCategory::Other("Unknown".into()));
        assert!(desc.is_empty());
    }

    #[test]
    fn truncate_body_is_char_safe() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn non_json_body_is_parse_error() {
        let err = parse::<OwStatus>("<html>bad gateway</html>", "forecast").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
