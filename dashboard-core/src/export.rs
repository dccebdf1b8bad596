//! Forecast explorer filtering plus CSV/JSON export of tables.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::ExportError, model::ConditionCategory, tabulate::ForecastTable, units::TemperatureUnit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown export format '{value}'. Supported formats: csv, json."
            )),
        }
    }
}

/// A forecast row as shown in the data explorer, temperatures in the
/// display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub date: NaiveDate,
    pub hour: u32,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: u8,
    pub weather: ConditionCategory,
    pub description: String,
}

/// Explorer filters. `None` means "don't filter on this".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastFilter {
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    /// Inclusive bounds in the display unit.
    pub temp_range: Option<(f64, f64)>,
    pub conditions: Option<Vec<ConditionCategory>>,
}

impl ForecastFilter {
    fn matches(&self, record: &ForecastRecord) -> bool {
        if let Some(query) = self.description.as_deref().filter(|q| !q.is_empty()) {
            if !record.description.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }

        if let Some((low, high)) = self.temp_range {
            if record.temp < low || record.temp > high {
                return false;
            }
        }

        match &self.conditions {
            Some(allowed) => allowed.contains(&record.weather),
            None => true,
        }
    }
}

/// Convert to the display unit, then keep the rows passing `filter`, in
/// chronological order.
pub fn filter_forecast(
    table: &ForecastTable,
    unit: TemperatureUnit,
    filter: &ForecastFilter,
) -> Vec<ForecastRecord> {
    table
        .iter()
        .map(|s| ForecastRecord {
            timestamp: s.timestamp,
            date: s.date,
            hour: s.hour,
            temp: unit.convert(s.temperature_c),
            feels_like: unit.convert(s.feels_like_c),
            humidity: s.humidity_pct,
            pressure: s.pressure_hpa,
            wind_speed: s.wind_speed_mps,
            clouds: s.cloud_cover_pct,
            weather: s.condition.clone(),
            description: s.description.clone(),
        })
        .filter(|r| filter.matches(r))
        .collect()
}

pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

pub fn from_csv<T: DeserializeOwned>(data: &str) -> Result<Vec<T>, ExportError> {
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    let rows = rdr.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(rows)
}

pub fn to_json<T: Serialize>(rows: &[T]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

pub fn from_json<T: DeserializeOwned>(data: &str) -> Result<Vec<T>, ExportError> {
    Ok(serde_json::from_str(data)?)
}

pub fn render<T: Serialize>(rows: &[T], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(rows),
        ExportFormat::Json => to_json(rows),
    }
}

/// `weather_analysis_{city}_{YYYYMMDD}.{ext}`
pub fn forecast_filename(city: &str, today: NaiveDate, format: ExportFormat) -> String {
    format!(
        "weather_analysis_{}_{}.{}",
        city.trim(),
        today.format("%Y%m%d"),
        format.extension()
    )
}

/// `city_comparison_{YYYYMMDD}.{ext}`
pub fn comparison_filename(today: NaiveDate, format: ExportFormat) -> String {
    format!("city_comparison_{}.{}", today.format("%Y%m%d"), format.extension())
}

/// Write rows to `dir/filename`, creating `dir` if needed.
pub fn write_export<T: Serialize>(
    dir: &Path,
    filename: &str,
    rows: &[T],
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, render(rows, format)?)?;
    Ok(path)
}
