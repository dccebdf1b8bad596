//! Terminal rendering of dashboard views.

use dashboard_core::{
    DashboardView, Severity,
    airquality::{AirQualityReport, PollutantStatus},
    compare::{ComparisonReport, Dimension},
    export::ForecastRecord,
    model::aqi_display,
    recommend::DISPLAY_LIMIT,
    stats::{CORRELATION_VARIABLES, correlation_matrix},
    units::TemperatureUnit,
};

const HOURLY_OUTLOOK: usize = 12;

pub fn print_view(view: &DashboardView) {
    let sym = view.unit.symbol();
    let cw = &view.current;

    println!();
    println!("{} {}  ({})", cw.condition.icon(), view.current.location_name, cw.description);
    println!("{}", "─".repeat(60));

    print_alerts(view);

    println!(
        "Temperature  {:.1}{sym}   feels like {:.1}{sym}",
        view.temperature(),
        view.feels_like()
    );
    println!("Air quality  {}", view.aqi_label);
    println!("Humidity     {}%", cw.humidity_pct);
    match cw.wind_direction_deg {
        Some(deg) => println!("Wind         {:.1} m/s from {deg:.0}°", cw.wind_speed_mps),
        None => println!("Wind         {:.1} m/s", cw.wind_speed_mps),
    }
    println!("Pressure     {:.0} hPa", cw.pressure_hpa);
    println!("Condition    {}", cw.condition);
    println!();

    for rec in view.recommendations.iter().take(DISPLAY_LIMIT) {
        println!("• {}: {}", rec.category, rec.message);
    }
    println!();

    print_summary(view);
    print_hourly(view);
}

fn print_alerts(view: &DashboardView) {
    if view.alerts.is_empty() {
        return;
    }
    for alert in &view.alerts {
        let tag = match alert.severity {
            Severity::Danger => "[DANGER] ",
            Severity::Warning => "[WARNING]",
            Severity::Success => "[OK]     ",
        };
        println!("{tag} {}: {}", alert.title, alert.message);
    }
    println!();
}

fn print_summary(view: &DashboardView) {
    let s = &view.summary;
    let sym = view.unit.symbol();

    println!("Forecast ({} samples over {} days)", view.forecast.len(), s.span_days);
    println!(
        "  Peak {:.1}{sym}  Low {:.1}{sym}  Average {:.1}{sym}  Range {:.1}{sym}",
        s.peak, s.low, s.average, s.range
    );
    println!(
        "  Avg humidity {:.0}%  Avg wind {:.1} m/s",
        s.avg_humidity, s.avg_wind_speed
    );
    println!(
        "  Comfort score {:.0}/100 ({})",
        s.comfort_score,
        s.comfort_level.message()
    );

    let dist: Vec<String> = s.conditions.iter().map(|(c, n)| format!("{c} {n}")).collect();
    println!("  Conditions: {}", dist.join(", "));
    println!();
}

fn print_hourly(view: &DashboardView) {
    let sym = view.unit.symbol();
    println!("Next hours");
    for (label, sample) in view.forecast.hourly_outlook(HOURLY_OUTLOOK) {
        println!(
            "  {label}  {:>6.1}{sym}  {}",
            view.unit.convert(sample.temperature_c),
            sample.description
        );
    }
}

pub fn print_statistics(view: &DashboardView) {
    let m = correlation_matrix(&view.forecast);

    println!();
    println!("Correlation");
    print!("{:>12}", "");
    for name in CORRELATION_VARIABLES {
        print!("{name:>12}");
    }
    println!();
    for (name, row) in CORRELATION_VARIABLES.iter().zip(m.iter()) {
        print!("{name:>12}");
        for cell in row {
            match cell {
                Some(v) => print!("{v:>12.2}"),
                None => print!("{:>12}", "-"),
            }
        }
        println!();
    }
}

pub fn print_air_header(view: &DashboardView) {
    println!(
        "{}  {:.1}{}  ({})",
        view.current.location_name,
        view.temperature(),
        view.unit.symbol(),
        view.current.description
    );
    println!("{}", "─".repeat(60));
}

pub fn print_air_quality(report: Option<&AirQualityReport>) {
    let Some(report) = report else {
        println!("Air quality data not available for this location.");
        return;
    };

    println!("AQI {}/5 ({})", report.aqi, report.label);
    println!("{}", report.advice);
    println!();
    println!("{:<8} {:>14} {:>12}  Status", "Pollutant", "μg/m³", "Safe limit");
    for r in &report.readings {
        let status = match r.status {
            PollutantStatus::Safe => "Safe",
            PollutantStatus::Elevated => "Elevated",
        };
        println!(
            "{:<8} {:>14.2} {:>12.0}  {status}",
            r.pollutant.symbol(),
            r.concentration,
            r.safe_limit
        );
    }
}

pub fn print_forecast_records(records: &[ForecastRecord], unit: TemperatureUnit) {
    let sym = unit.symbol();
    println!(
        "{:<17} {:>8} {:>8} {:>5} {:>7} {:>6}  {:<13} Description",
        "Time", "Temp", "Feels", "Hum", "hPa", "Wind", "Weather"
    );
    for r in records {
        println!(
            "{:<17} {:>6.1}{sym} {:>6.1}{sym} {:>4}% {:>7.0} {:>6.1}  {:<13} {}",
            r.timestamp.format("%Y-%m-%d %H:%M"),
            r.temp,
            r.feels_like,
            r.humidity,
            r.pressure,
            r.wind_speed,
            r.weather.as_str(),
            r.description
        );
    }
    println!();
    println!("Total records: {}", records.len());
}

pub fn print_comparison(report: &ComparisonReport) {
    let sym = report.unit.symbol();

    println!(
        "{:<16} {:>8} {:>8} {:>5} {:>7} {:>6} {:>10}  Weather",
        "City", "Temp", "Feels", "Hum", "hPa", "Wind", "AQI"
    );
    for row in &report.rows {
        println!(
            "{:<16} {:>6.1}{sym} {:>6.1}{sym} {:>4}% {:>7.0} {:>6.1} {:>10}  {}",
            row.city,
            row.temperature,
            row.feels_like,
            row.humidity_pct,
            row.pressure_hpa,
            row.wind_speed_mps,
            aqi_display(row.aqi),
            row.condition
        );
    }

    println!();
    println!("Normalized (0-100)");
    print!("{:<16}", "City");
    for dim in Dimension::all() {
        print!(" {:>11}", dim.label());
    }
    println!();
    for row in &report.rows {
        print!("{:<16}", row.city);
        for dim in Dimension::all() {
            print!(" {:>11.0}", row.score(*dim));
        }
        println!();
    }

    for failure in &report.failures {
        eprintln!("Could not load {}: {}", failure.city, failure.reason);
    }
}
