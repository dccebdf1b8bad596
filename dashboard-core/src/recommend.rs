use serde::Serialize;

use crate::{
    model::{ConditionCategory, CurrentConditions},
    tabulate::ForecastTable,
    units::TemperatureUnit,
};

/// How many recommendations the dashboard shows.
pub const DISPLAY_LIMIT: usize = 3;

const WARM_CLOTHING_ABOVE_C: f64 = 25.0;
const WARM_LAYERS_BELOW_C: f64 = 15.0;
const OUTDOOR_RANGE_C: (f64, f64) = (15.0, 30.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
}

impl Recommendation {
    fn new(category: &str, message: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            message: message.into(),
        }
    }
}

/// Clothing, then an optional activity, then warmest/coolest forecast time.
pub fn generate_recommendations(
    current: &CurrentConditions,
    forecast: &ForecastTable,
    unit: TemperatureUnit,
) -> Vec<Recommendation> {
    let mut recs = vec![clothing(current.temperature_c)];

    if let Some(activity) = activity(&current.condition, current.temperature_c) {
        recs.push(activity);
    }

    recs.push(best_time(forecast, unit));
    recs
}

fn clothing(temp_c: f64) -> Recommendation {
    if temp_c > WARM_CLOTHING_ABOVE_C {
        Recommendation::new(
            "Clothing",
            "Light, breathable clothing recommended. Don't forget sunscreen!",
        )
    } else if temp_c < WARM_LAYERS_BELOW_C {
        Recommendation::new("Clothing", "Warm layers recommended. Consider a jacket or coat.")
    } else {
        Recommendation::new(
            "Clothing",
            "Comfortable casual wear. A light jacket might be useful.",
        )
    }
}

fn activity(condition: &ConditionCategory, temp_c: f64) -> Option<Recommendation> {
    let (low, high) = OUTDOOR_RANGE_C;
    match condition {
        ConditionCategory::Clear | ConditionCategory::Clouds if temp_c > low && temp_c < high => {
            Some(Recommendation::new(
                "Activities",
                "Perfect weather for outdoor activities! Great for jogging, cycling, or picnics.",
            ))
        }
        ConditionCategory::Rain => Some(Recommendation::new(
            "Activities",
            "Indoor activities recommended. Carry an umbrella if going out.",
        )),
        _ => None,
    }
}

fn best_time(forecast: &ForecastTable, unit: TemperatureUnit) -> Recommendation {
    let ext = forecast.temperature_extremes();
    let sym = unit.symbol();

    Recommendation::new(
        "Best Time",
        format!(
            "Warmest at {} ({:.1}{sym}), Coolest at {} ({:.1}{sym})",
            ext.warmest.timestamp.format("%I:%M %p"),
            unit.convert(ext.warmest.temperature_c),
            ext.coolest.timestamp.format("%I:%M %p"),
            unit.convert(ext.coolest.temperature_c),
        ),
    )
}
