//! The derivation pipeline: bundle → table → alerts, recommendations,
//! statistics and air quality.

use chrono::{Local, TimeZone};
use tracing::{info, instrument, warn};

use crate::{
    airquality::{AirQualityReport, air_quality_report},
    alerts::{Alert, AlertThresholds, generate_alerts},
    compare::{CityFailure, ComparisonReport, ComparisonRow},
    error::FetchError,
    model::{CurrentConditions, PollutionSample, WeatherBundle, aqi_display},
    provider::WeatherProvider,
    recommend::{Recommendation, generate_recommendations},
    stats::{ForecastSummary, summarize},
    tabulate::{ForecastTable, tabulate},
    units::TemperatureUnit,
};

/// Everything rendered for one city in one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub city: String,
    pub unit: TemperatureUnit,
    pub current: CurrentConditions,
    pub pollution: Option<PollutionSample>,
    pub aqi_label: &'static str,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<Recommendation>,
    pub forecast: ForecastTable,
    pub summary: ForecastSummary,
    pub air_quality: Option<AirQualityReport>,
}

impl DashboardView {
    pub fn temperature(&self) -> f64 {
        self.unit.convert(self.current.temperature_c)
    }

    pub fn feels_like(&self) -> f64 {
        self.unit.convert(self.current.feels_like_c)
    }
}

/// Pure: the same bundle and inputs always produce the same view.
pub fn derive<Tz: TimeZone>(
    bundle: &WeatherBundle,
    unit: TemperatureUnit,
    thresholds: &AlertThresholds,
    tz: &Tz,
) -> DashboardView {
    let forecast = tabulate(&bundle.forecast, tz);
    let pollution = bundle.pollution.clone();

    DashboardView {
        city: bundle.city.clone(),
        unit,
        current: bundle.current.clone(),
        aqi_label: aqi_display(pollution.as_ref().map(|p| p.aqi)),
        alerts: generate_alerts(&bundle.current, pollution.as_ref(), thresholds),
        recommendations: generate_recommendations(&bundle.current, &forecast, unit),
        summary: summarize(&forecast, unit),
        air_quality: pollution.as_ref().map(air_quality_report),
        pollution,
        forecast,
    }
}

#[derive(Debug)]
pub struct Dashboard<P> {
    provider: P,
    thresholds: AlertThresholds,
}

impl<P: WeatherProvider> Dashboard<P> {
    pub fn new(provider: P, thresholds: AlertThresholds) -> Self {
        Self {
            provider,
            thresholds,
        }
    }

    /// Fetch one city and derive its view in the local timezone.
    #[instrument(skip(self))]
    pub async fn load(
        &self,
        city: &str,
        unit: TemperatureUnit,
    ) -> Result<DashboardView, FetchError> {
        let bundle = self.provider.fetch_bundle(city).await?;
        let view = derive(&bundle, unit, &self.thresholds, &Local);
        info!(alerts = view.alerts.len(), "Derived dashboard");
        Ok(view)
    }

    /// Fetch each city in turn. A failure is recorded and the rest continue.
    #[instrument(skip(self), fields(count = cities.len()))]
    pub async fn compare(&self, cities: &[String], unit: TemperatureUnit) -> ComparisonReport {
        let mut rows = Vec::with_capacity(cities.len());
        let mut failures = Vec::new();

        for city in cities {
            match self.provider.fetch_bundle(city).await {
                Ok(bundle) => rows.push(ComparisonRow::from_bundle(city, &bundle, unit)),
                Err(err) => {
                    warn!(city = %city, error = %err, "Comparison fetch failed");
                    failures.push(CityFailure {
                        city: city.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(ok = rows.len(), failed = failures.len(), "Comparison completed");
        ComparisonReport {
            unit,
            rows,
            failures,
        }
    }
}
