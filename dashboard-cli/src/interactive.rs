//! Menu-driven session. The [`Session`] is created here and dropped when
//! the loop ends.

use std::fmt;

use chrono::Local;
use dashboard_core::{
    Config, Dashboard, DashboardView, FetchError, Session, WeatherProvider,
    export::{self, ExportFormat, ForecastFilter},
};
use inquire::{InquireError, MultiSelect, Select, Text};
use tracing::debug;

use crate::{cli, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    QuickSelect,
    OpenFavorite,
    AddFavorite,
    RemoveFavorite,
    AddComparison,
    RemoveComparison,
    ClearComparison,
    RunComparison,
    AirQuality,
    ExportForecast,
    ToggleUnit,
    History,
    Quit,
}

impl Action {
    const ALL: [Action; 14] = [
        Action::Search,
        Action::QuickSelect,
        Action::OpenFavorite,
        Action::AddFavorite,
        Action::RemoveFavorite,
        Action::AddComparison,
        Action::RemoveComparison,
        Action::ClearComparison,
        Action::RunComparison,
        Action::AirQuality,
        Action::ExportForecast,
        Action::ToggleUnit,
        Action::History,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search city",
            Action::QuickSelect => "Quick select",
            Action::OpenFavorite => "Open favorite",
            Action::AddFavorite => "Add current city to favorites",
            Action::RemoveFavorite => "Remove favorite",
            Action::AddComparison => "Add city to comparison",
            Action::RemoveComparison => "Remove city from comparison",
            Action::ClearComparison => "Clear comparison",
            Action::RunComparison => "Compare cities",
            Action::AirQuality => "Air quality breakdown",
            Action::ExportForecast => "Export forecast",
            Action::ToggleUnit => "Toggle °C/°F",
            Action::History => "Recent searches",
            Action::Quit => "Quit",
        })
    }
}

pub async fn run<P: WeatherProvider>(config: &Config, dash: &Dashboard<P>) -> anyhow::Result<()> {
    let mut session = Session::new(config.default_unit);
    let mut city: Option<String> = None;

    loop {
        let action = match Select::new("What next?", Action::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };
        debug!(?action, "Session action");

        let picked = match action {
            Action::Quit => break,
            Action::Search => prompt_text("City:")?,
            Action::QuickSelect => prompt_choice("Quick select:", &config.quick_cities)?,
            Action::OpenFavorite => prompt_choice("Favorite:", session.favorites())?,
            Action::AddFavorite => {
                match city.as_deref() {
                    Some(c) if session.add_favorite(c) => println!("Added {c} to favorites."),
                    Some(c) => println!("{c} is already a favorite."),
                    None => println!("Search for a city first."),
                }
                None
            }
            Action::RemoveFavorite => {
                if let Some(c) = prompt_choice("Remove favorite:", session.favorites())? {
                    session.remove_favorite(&c);
                }
                None
            }
            Action::AddComparison => {
                if let Some(c) = prompt_text("City to compare:")? {
                    if !session.add_comparison(&c) {
                        println!("{c} is already in the comparison list.");
                    }
                }
                None
            }
            Action::RemoveComparison => {
                if let Some(c) = prompt_choice("Remove:", session.comparison())? {
                    session.remove_comparison(&c);
                }
                None
            }
            Action::ClearComparison => {
                session.clear_comparison();
                None
            }
            Action::RunComparison => {
                let cities: Vec<String> =
                    city.iter().chain(session.comparison()).cloned().collect();
                if session.comparison().is_empty() {
                    println!("Add at least one city to the comparison list.");
                } else {
                    let report = dash.compare(&cities, session.unit).await;
                    render::print_comparison(&report);
                }
                None
            }
            Action::AirQuality => {
                if let Some(c) = city.as_deref() {
                    match dash.load(c, session.unit).await {
                        Ok(view) => render::print_air_quality(view.air_quality.as_ref()),
                        Err(e) => report_load_error(&e),
                    }
                }
                None
            }
            Action::ExportForecast => {
                if let Some(c) = city.as_deref() {
                    export_forecast(dash, c, &session).await?;
                }
                None
            }
            Action::ToggleUnit => {
                let unit = session.toggle_unit();
                println!("Showing temperatures in {unit}.");
                city.clone()
            }
            Action::History => {
                for h in session.recent_searches() {
                    println!("• {h}");
                }
                None
            }
        };

        if let Some(next) = picked {
            session.record_search(&next);
            match dash.load(&next, session.unit).await {
                Ok(view) => {
                    render::print_view(&view);
                    city = Some(next);
                }
                // Not found and transport failures are shown, not fatal.
                Err(e) => report_load_error(&e),
            }
        }
    }

    Ok(())
}

fn report_load_error(err: &FetchError) {
    if err.is_not_found() {
        eprintln!("{err}. Check the spelling and try again.");
    } else {
        eprintln!("{err}");
    }
}

/// Exports the explorer table as filtered here, not the whole forecast.
async fn export_forecast<P: WeatherProvider>(
    dash: &Dashboard<P>,
    city: &str,
    session: &Session,
) -> anyhow::Result<()> {
    let view = match dash.load(city, session.unit).await {
        Ok(view) => view,
        Err(e) => {
            report_load_error(&e);
            return Ok(());
        }
    };

    let filter = prompt_filter(&view)?;
    let records = export::filter_forecast(&view.forecast, session.unit, &filter);
    render::print_forecast_records(&records, session.unit);

    let format = match Select::new("Format:", vec!["csv", "json"]).prompt() {
        Ok(f) => ExportFormat::try_from(f)?,
        Err(InquireError::OperationCanceled) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let name = export::forecast_filename(city, Local::now().date_naive(), format);
    cli::write(std::path::Path::new("."), &name, &records, format)
}

fn prompt_filter(view: &DashboardView) -> anyhow::Result<ForecastFilter> {
    let sym = view.unit.symbol();
    let (low, peak) = (view.summary.low, view.summary.peak);

    let search = prompt_text("Search descriptions (blank for all):")?;
    let min = prompt_bound(&format!("Minimum temperature {sym} (blank for {low:.1}):"))?;
    let max = prompt_bound(&format!("Maximum temperature {sym} (blank for {peak:.1}):"))?;

    let options: Vec<String> = view
        .summary
        .conditions
        .iter()
        .map(|(condition, _)| condition.to_string())
        .collect();
    let conditions = if options.len() > 1 {
        match MultiSelect::new("Weather types (none keeps all):", options).prompt() {
            Ok(picked) => picked,
            Err(InquireError::OperationCanceled) => Vec::new(),
            Err(e) => return Err(e.into()),
        }
    } else {
        Vec::new()
    };

    Ok(cli::build_filter(search, min, max, conditions, low, peak))
}

fn prompt_bound(message: &str) -> anyhow::Result<Option<f64>> {
    let Some(input) = prompt_text(message)? else {
        return Ok(None);
    };
    let bound = parse_bound(&input);
    if bound.is_none() {
        println!("'{input}' is not a temperature; leaving that bound open.");
    }
    Ok(bound)
}

fn parse_bound(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn prompt_text(message: &str) -> anyhow::Result<Option<String>> {
    match Text::new(message).prompt() {
        Ok(s) if s.trim().is_empty() => Ok(None),
        Ok(s) => Ok(Some(s.trim().to_string())),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn prompt_choice(message: &str, options: &[String]) -> anyhow::Result<Option<String>> {
    if options.is_empty() {
        println!("Nothing to choose from yet.");
        return Ok(None);
    }
    match Select::new(message, options.to_vec()).prompt() {
        Ok(s) => Ok(Some(s)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
