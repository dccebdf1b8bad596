use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, error::FetchError, model::WeatherBundle};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of weather bundles. One attempt per call, no retries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions, forecast and (optional) pollution for `city`.
    async fn fetch_bundle(&self, city: &str) -> Result<WeatherBundle, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.resolve_api_key()?;
    OpenWeatherProvider::with_options(api_key, config.base_url.clone(), config.timeout())
}
