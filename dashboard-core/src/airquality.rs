use serde::Serialize;

use crate::model::{AqiLevel, Pollutant, PollutionSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PollutantStatus {
    Safe,
    Elevated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    pub concentration: f64,
    pub safe_limit: f64,
    pub status: PollutantStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    pub aqi: i64,
    pub label: &'static str,
    pub advice: &'static str,
    pub readings: Vec<PollutantReading>,
}

pub fn air_quality_report(sample: &PollutionSample) -> AirQualityReport {
    let readings = Pollutant::all()
        .iter()
        .map(|&pollutant| {
            let concentration = sample.concentration(pollutant);
            let safe_limit = pollutant.safe_limit();
            let status = if concentration < safe_limit {
                PollutantStatus::Safe
            } else {
                PollutantStatus::Elevated
            };
            PollutantReading {
                pollutant,
                concentration,
                safe_limit,
                status,
            }
        })
        .collect();

    AirQualityReport {
        aqi: sample.aqi,
        label: sample.label(),
        advice: advice(sample.aqi),
        readings,
    }
}

fn advice(aqi: i64) -> &'static str {
    match AqiLevel::from_index(aqi) {
        Some(AqiLevel::Good | AqiLevel::Fair) => "Air quality is good. Enjoy outdoor activities!",
        Some(AqiLevel::Moderate) => "Sensitive groups should limit prolonged outdoor exposure.",
        Some(AqiLevel::Poor | AqiLevel::VeryPoor) => {
            "Everyone should reduce outdoor activities. Wear a mask if going out."
        }
        None => "Air quality category is unknown for this reading.",
    }
}
