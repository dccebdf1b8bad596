use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, Dashboard, OpenWeatherProvider, TemperatureUnit,
    export::{self, ExportFormat, ForecastFilter},
    model::ConditionCategory,
    provider::provider_from_config,
};
use inquire::{Password, Select};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather analytics dashboard")]
pub struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default unit.
    Configure,

    /// Current conditions, alerts, recommendations and forecast summary.
    Show {
        /// City name; defaults to the configured default city.
        city: Option<String>,

        #[arg(long, value_parser = parse_unit)]
        unit: Option<TemperatureUnit>,

        /// Also print the correlation matrix.
        #[arg(long)]
        stats: bool,
    },

    /// Explore and export the 5-day forecast table.
    Forecast {
        city: String,

        #[arg(long, value_parser = parse_unit)]
        unit: Option<TemperatureUnit>,

        /// Keep rows whose description contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Minimum temperature, in the display unit.
        #[arg(long)]
        min: Option<f64>,

        /// Maximum temperature, in the display unit.
        #[arg(long)]
        max: Option<f64>,

        /// Weather type to keep, e.g. Rain. Repeatable.
        #[arg(long = "condition")]
        conditions: Vec<String>,

        #[arg(long, value_parser = parse_format)]
        export: Option<ExportFormat>,

        /// Directory for exported files.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Pollutant breakdown for a city.
    Air {
        city: String,

        #[arg(long, value_parser = parse_unit)]
        unit: Option<TemperatureUnit>,
    },

    /// Compare several cities side by side.
    Compare {
        #[arg(required = true, num_args = 1..)]
        cities: Vec<String>,

        #[arg(long, value_parser = parse_unit)]
        unit: Option<TemperatureUnit>,

        #[arg(long, value_parser = parse_format)]
        export: Option<ExportFormat>,

        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Interactive session with favorites, history and comparison list.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, unit, stats } => {
                let config = Config::load()?;
                let city = city.unwrap_or_else(|| config.default_city.clone());
                let unit = unit.unwrap_or(config.default_unit);

                let view = dashboard(&config)?.load(&city, unit).await?;
                render::print_view(&view);
                if stats {
                    render::print_statistics(&view);
                }
                Ok(())
            }
            Command::Forecast {
                city,
                unit,
                search,
                min,
                max,
                conditions,
                export,
                out,
            } => {
                let config = Config::load()?;
                let unit = unit.unwrap_or(config.default_unit);
                let view = dashboard(&config)?.load(&city, unit).await?;

                let (low, peak) = (view.summary.low, view.summary.peak);
                let filter = build_filter(search, min, max, conditions, low, peak);
                let records = export::filter_forecast(&view.forecast, unit, &filter);
                render::print_forecast_records(&records, unit);

                if let Some(format) = export {
                    let name = export::forecast_filename(&city, Local::now().date_naive(), format);
                    write(&out, &name, &records, format)?;
                }
                Ok(())
            }
            Command::Air { city, unit } => {
                let config = Config::load()?;
                let unit = unit.unwrap_or(config.default_unit);
                let view = dashboard(&config)?.load(&city, unit).await?;
                render::print_air_header(&view);
                render::print_air_quality(view.air_quality.as_ref());
                Ok(())
            }
            Command::Compare {
                cities,
                unit,
                export,
                out,
            } => {
                let config = Config::load()?;
                let unit = unit.unwrap_or(config.default_unit);

                let report = dashboard(&config)?.compare(&cities, unit).await;
                render::print_comparison(&report);

                if let Some(format) = export {
                    let name = export::comparison_filename(Local::now().date_naive(), format);
                    write(&out, &name, &report.rows, format)?;
                }
                Ok(())
            }
            Command::Interactive => {
                let config = Config::load()?;
                let dash = dashboard(&config)?;
                interactive::run(&config, &dash).await
            }
        }
    }
}

pub fn dashboard(config: &Config) -> anyhow::Result<Dashboard<OpenWeatherProvider>> {
    let provider = provider_from_config(config)?;
    Ok(Dashboard::new(provider, config.thresholds.clone()))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key);

    let unit = Select::new("Default temperature unit:", TemperatureUnit::all().to_vec())
        .prompt()
        .context("Failed to read temperature unit")?;
    config.default_unit = unit;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Missing range bounds fall back to the forecast's own low/peak.
pub(crate) fn build_filter(
    search: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    conditions: Vec<String>,
    low: f64,
    peak: f64,
) -> ForecastFilter {
    let temp_range = match (min, max) {
        (None, None) => None,
        (min, max) => Some((min.unwrap_or(low), max.unwrap_or(peak))),
    };
    let conditions = if conditions.is_empty() {
        None
    } else {
        Some(conditions.iter().map(|c| ConditionCategory::from(c.as_str())).collect())
    };

    ForecastFilter {
        description: search,
        temp_range,
        conditions,
    }
}

pub fn write<T: serde::Serialize>(
    dir: &Path,
    name: &str,
    rows: &[T],
    format: ExportFormat,
) -> anyhow::Result<()> {
    let path = export::write_export(dir, name, rows, format)
        .with_context(|| format!("Failed to export {name}"))?;
    println!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn parse_unit(s: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::try_from(s).map_err(|e| e.to_string())
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::try_from(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_forecast_filters() {
        let cli = Cli::parse_from([
            "weather-dashboard",
            "forecast",
            "Mumbai",
            "--unit",
            "f",
            "--min",
            "60",
            "--condition",
            "Rain",
            "--condition",
            "Clouds",
            "--export",
            "json",
        ]);

        match cli.command {
            Command::Forecast {
                city,
                unit,
                min,
                max,
                conditions,
                export,
                ..
            } => {
                assert_eq!(city, "Mumbai");
                assert_eq!(unit, Some(TemperatureUnit::Fahrenheit));
                assert_eq!(min, Some(60.0));
                assert_eq!(max, None);
                assert_eq!(conditions, ["Rain", "Clouds"]);
                assert_eq!(export, Some(ExportFormat::Json));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn compare_requires_a_city() {
        assert!(Cli::try_parse_from(["weather-dashboard", "compare"]).is_err());
    }

    #[test]
    fn air_takes_a_unit() {
        let cli = Cli::parse_from(["weather-dashboard", "air", "Delhi", "--unit", "fahrenheit"]);
        match cli.command {
            Command::Air { city, unit } => {
                assert_eq!(city, "Delhi");
                assert_eq!(unit, Some(TemperatureUnit::Fahrenheit));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::parse_from(["weather-dashboard", "air", "Delhi"]);
        assert!(matches!(cli.command, Command::Air { unit: None, .. }));
    }

    #[test]
    fn bad_unit_is_rejected() {
        assert!(Cli::try_parse_from(["weather-dashboard", "show", "--unit", "kelvin"]).is_err());
    }

    #[test]
    fn filter_fills_open_bound_from_forecast() {
        let f = build_filter(None, Some(60.0), None, vec![], 50.0, 90.0);
        assert_eq!(f.temp_range, Some((60.0, 90.0)));
        assert!(f.conditions.is_none());

        let f = build_filter(Some("rain".into()), None, None, vec!["Rain".into()], 50.0, 90.0);
        assert_eq!(f.temp_range, None);
        assert_eq!(f.conditions, Some(vec![ConditionCategory::Rain]));
    }
}
