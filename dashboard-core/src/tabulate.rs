//! Flattens a forecast series into display-timezone rows.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::model::{ConditionCategory, ForecastSeries};

/// A forecast step with its calendar date and hour resolved in the display
/// timezone. Temperatures stay in °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<FixedOffset>,
    pub date: NaiveDate,
    pub hour: u32,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub cloud_cover_pct: u8,
    pub condition: ConditionCategory,
    pub description: String,
}

/// Tabulated forecast. Non-empty and chronological because it can only be
/// built from a [`ForecastSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    samples: Vec<ForecastSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureExtremes {
    pub warmest: ForecastSample,
    pub coolest: ForecastSample,
}

pub fn tabulate<Tz: TimeZone>(series: &ForecastSeries, tz: &Tz) -> ForecastTable {
    let samples = series
        .points()
        .iter()
        .map(|point| {
            let offset = tz.offset_from_utc_datetime(&point.time.naive_utc()).fix();
            let timestamp = point.time.with_timezone(&offset);

            ForecastSample {
                timestamp,
                date: timestamp.date_naive(),
                hour: timestamp.hour(),
                temperature_c: point.temperature_c,
                feels_like_c: point.feels_like_c,
                humidity_pct: point.humidity_pct,
                pressure_hpa: point.pressure_hpa,
                wind_speed_mps: point.wind_speed_mps,
                cloud_cover_pct: point.cloud_cover_pct,
                condition: point.condition.clone(),
                description: point.description.clone(),
            }
        })
        .collect();

    ForecastTable { samples }
}

impl ForecastTable {
    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForecastSample> {
        self.samples.iter()
    }

    /// Warmest and coolest samples; ties go to the earliest one.
    pub fn temperature_extremes(&self) -> TemperatureExtremes {
        let first = &self.samples[0];
        let (mut warmest, mut coolest) = (first, first);

        for sample in &self.samples[1..] {
            if sample.temperature_c > warmest.temperature_c {
                warmest = sample;
            }
            if sample.temperature_c < coolest.temperature_c {
                coolest = sample;
            }
        }

        TemperatureExtremes {
            warmest: warmest.clone(),
            coolest: coolest.clone(),
        }
    }

    /// The next `n` samples, labelled like "03 PM".
    pub fn hourly_outlook(&self, n: usize) -> Vec<(String, &ForecastSample)> {
        self.samples
            .iter()
            .take(n)
            .map(|s| (s.timestamp.format("%I %p").to_string(), s))
            .collect()
    }
}
