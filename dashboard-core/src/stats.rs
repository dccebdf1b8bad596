use serde::Serialize;

use crate::{model::ConditionCategory, tabulate::ForecastTable, units::TemperatureUnit};

const COMFORT_REFERENCE_TEMP_C: f64 = 22.0;
const COMFORT_REFERENCE_HUMIDITY: f64 = 50.0;
const COMFORT_TEMP_WEIGHT: f64 = 2.0;
const COMFORT_HUMIDITY_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComfortLevel {
    Excellent,
    Moderate,
    Challenging,
}

impl ComfortLevel {
    pub fn message(&self) -> &'static str {
        match self {
            ComfortLevel::Excellent => "Excellent conditions!",
            ComfortLevel::Moderate => "Moderate conditions",
            ComfortLevel::Challenging => "Challenging conditions",
        }
    }
}

/// 0–100 heuristic penalising distance from 22 °C and 50 % humidity.
pub fn comfort_score(avg_temp_c: f64, avg_humidity: f64) -> f64 {
    let score = 100.0
        - (avg_temp_c - COMFORT_REFERENCE_TEMP_C).abs() * COMFORT_TEMP_WEIGHT
        - (avg_humidity - COMFORT_REFERENCE_HUMIDITY).abs() * COMFORT_HUMIDITY_WEIGHT;
    score.clamp(0.0, 100.0)
}

pub fn comfort_level(score: f64) -> ComfortLevel {
    if score > 70.0 {
        ComfortLevel::Excellent
    } else if score > 50.0 {
        ComfortLevel::Moderate
    } else {
        ComfortLevel::Challenging
    }
}

/// Headline numbers for the forecast horizon. Temperatures in the display
/// unit; the comfort score is always computed from Celsius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub unit: TemperatureUnit,
    pub peak: f64,
    pub low: f64,
    pub average: f64,
    pub range: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
    pub comfort_score: f64,
    pub comfort_level: ComfortLevel,
    pub span_days: i64,
    pub conditions: Vec<(ConditionCategory, usize)>,
}

pub fn summarize(table: &ForecastTable, unit: TemperatureUnit) -> ForecastSummary {
    let n = table.len() as f64;
    let temps: Vec<f64> = table.iter().map(|s| s.temperature_c).collect();

    let peak_c = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low_c = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let avg_c = temps.iter().sum::<f64>() / n;
    let avg_humidity = table.iter().map(|s| f64::from(s.humidity_pct)).sum::<f64>() / n;
    let avg_wind_speed = table.iter().map(|s| s.wind_speed_mps).sum::<f64>() / n;

    let samples = table.samples();
    let span_days = samples
        .iter()
        .map(|s| s.timestamp)
        .max()
        .zip(samples.iter().map(|s| s.timestamp).min())
        .map_or(0, |(last, first)| (last - first).num_days());

    let score = comfort_score(avg_c, avg_humidity);
    let peak = unit.convert(peak_c);
    let low = unit.convert(low_c);

    ForecastSummary {
        unit,
        peak,
        low,
        average: unit.convert(avg_c),
        range: peak - low,
        avg_humidity,
        avg_wind_speed,
        comfort_score: score,
        comfort_level: comfort_level(score),
        span_days,
        conditions: condition_distribution(table),
    }
}

/// Sample count per condition, most frequent first; ties keep first-seen order.
pub fn condition_distribution(table: &ForecastTable) -> Vec<(ConditionCategory, usize)> {
    let mut counts: Vec<(ConditionCategory, usize)> = Vec::new();
    for sample in table.iter() {
        match counts.iter_mut().find(|(c, _)| *c == sample.condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((sample.condition.clone(), 1)),
        }
    }
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub const CORRELATION_VARIABLES: [&str; 4] = ["Temperature", "Humidity", "Pressure", "Wind"];

/// Pearson correlation between temperature, humidity, pressure and wind
/// speed. Cells involving a constant column are `None`.
pub fn correlation_matrix(table: &ForecastTable) -> [[Option<f64>; 4]; 4] {
    let columns: [Vec<f64>; 4] = [
        table.iter().map(|s| s.temperature_c).collect(),
        table.iter().map(|s| f64::from(s.humidity_pct)).collect(),
        table.iter().map(|s| s.pressure_hpa).collect(),
        table.iter().map(|s| s.wind_speed_mps).collect(),
    ];

    let mut matrix = [[None; 4]; 4];
    for (i, row) in matrix.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = pearson(&columns[i], &columns[j]);
        }
    }
    matrix
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}
