//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Typed weather models and the OpenWeather provider
//! - The derivation layer: forecast tabulation, alerts, recommendations,
//!   statistics, air quality and multi-city comparison
//! - Session state and table export
//!
//! It is used by `dashboard-cli`, but can also be reused by other binaries or services.

pub mod airquality;
pub mod alerts;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod model;
pub mod provider;
pub mod recommend;
pub mod session;
pub mod stats;
pub mod tabulate;
pub mod units;

pub use alerts::{Alert, AlertThresholds, Severity};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardView, derive};
pub use error::{ExportError, FetchError};
pub use model::WeatherBundle;
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use session::Session;
pub use units::TemperatureUnit;
