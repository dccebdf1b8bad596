use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;

use dashboard_core::{
    AlertThresholds, TemperatureUnit, WeatherBundle,
    compare::ComparisonRow,
    derive,
    export::{self, ExportFormat, ForecastFilter, ForecastRecord},
    model::{
        ConditionCategory, Coordinates, CurrentConditions, ForecastPoint, ForecastSeries,
        Pollutant, PollutionSample,
    },
};

fn point(ts: i64, temp: f64, main: &str, description: &str) -> ForecastPoint {
    ForecastPoint {
        time: DateTime::from_timestamp(ts, 0).unwrap(),
        temperature_c: temp,
        feels_like_c: temp - 0.7,
        humidity_pct: 71,
        pressure_hpa: 1009.0,
        wind_speed_mps: 4.37,
        cloud_cover_pct: 20,
        condition: ConditionCategory::from(main),
        description: description.to_string(),
    }
}

fn bundle(city: &str, temp: f64, pollution: Option<PollutionSample>) -> WeatherBundle {
    let base = 1_717_236_000;
    WeatherBundle {
        city: city.to_string(),
        current: CurrentConditions {
            location_name: city.to_string(),
            temperature_c: temp,
            feels_like_c: temp + 1.3,
            humidity_pct: 88,
            pressure_hpa: 1004.0,
            wind_speed_mps: 16.2,
            wind_direction_deg: None,
            condition: ConditionCategory::Rain,
            description: "moderate rain".into(),
            coordinates: Coordinates {
                lat: 48.85,
                lon: 2.35,
            },
            observation_time: DateTime::from_timestamp(base, 0).unwrap(),
        },
        forecast: ForecastSeries::new(vec![
            point(base, 17.3, "Rain", "light rain"),
            point(base + 10_800, 21.9, "Clouds", "broken clouds"),
            point(base + 21_600, 23.4, "Clear", "clear sky"),
            point(base + 32_400, 19.1, "Snow", "light snow, \"rare\""),
        ])
        .unwrap(),
        pollution,
    }
}

fn records(unit: TemperatureUnit, filter: &ForecastFilter) -> Vec<ForecastRecord> {
    let view = derive(
        &bundle("Paris", 18.4, None),
        unit,
        &AlertThresholds::default(),
        &FixedOffset::east_opt(3600).unwrap(),
    );
    export::filter_forecast(&view.forecast, unit, filter)
}

#[test]
fn filtered_forecast_survives_csv_roundtrip() {
    let filter = ForecastFilter {
        temp_range: Some((64.0, 80.0)),
        ..Default::default()
    };
    let rows = records(TemperatureUnit::Fahrenheit, &filter);
    assert_eq!(rows.len(), 3);

    let csv = export::to_csv(&rows).unwrap();
    let back: Vec<ForecastRecord> = export::from_csv(&csv).unwrap();

    assert_eq!(back.len(), rows.len());
    assert_eq!(back, rows);
}

#[test]
fn filtered_forecast_survives_json_roundtrip() {
    let filter = ForecastFilter {
        description: Some("LIGHT".into()),
        ..Default::default()
    };
    let rows = records(TemperatureUnit::Fahrenheit, &filter);
    assert_eq!(rows.len(), 2);

    let json = export::to_json(&rows).unwrap();
    assert!(json.contains("+01:00"));

    let back: Vec<ForecastRecord> = export::from_json(&json).unwrap();
    assert_eq!(back, rows);
}

#[test]
fn comparison_table_roundtrips_with_missing_aqi() {
    let poll = PollutionSample {
        aqi: 2,
        components: BTreeMap::from([(Pollutant::O3, 61.2)]),
    };
    let unit = TemperatureUnit::Celsius;
    let rows = vec![
        ComparisonRow::from_bundle("paris", &bundle("paris", 18.4, Some(poll)), unit),
        ComparisonRow::from_bundle("oslo", &bundle("oslo", -3.5, None), unit),
    ];

    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let text = export::render(&rows, format).unwrap();
        let back: Vec<ComparisonRow> = match format {
            ExportFormat::Csv => export::from_csv(&text).unwrap(),
            ExportFormat::Json => export::from_json(&text).unwrap(),
        };
        assert_eq!(back, rows, "{format:?}");
    }

    assert_eq!(rows[1].aqi, None);
    assert_eq!(rows[1].aqi_score, 0.0);
}

#[test]
fn full_pipeline_is_idempotent() {
    let poll = PollutionSample {
        aqi: 3,
        components: BTreeMap::new(),
    };
    let b = bundle("Paris", 18.4, Some(poll));
    let t = AlertThresholds::default();

    let a = derive(&b, TemperatureUnit::Celsius, &t, &Utc);
    let c = derive(&b, TemperatureUnit::Celsius, &t, &Utc);
    assert_eq!(a.alerts, c.alerts);
    assert_eq!(a.recommendations, c.recommendations);

    let titles: Vec<&str> = a.alerts.iter().map(|x| x.title.as_str()).collect();
    assert_eq!(titles, ["High Wind", "High Humidity", "Moderate Air Quality"]);

    let row_a = ComparisonRow::from_bundle("Paris", &b, TemperatureUnit::Celsius);
    let row_c = ComparisonRow::from_bundle("Paris", &b, TemperatureUnit::Celsius);
    assert_eq!(row_a, row_c);
}
