//! Per-session UI state. Lives for one interactive run; never persisted.

use crate::units::TemperatureUnit;

const RECENT_SEARCHES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub unit: TemperatureUnit,
    favorites: Vec<String>,
    history: Vec<String>,
    comparison: Vec<String>,
}

impl Session {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn comparison(&self) -> &[String] {
        &self.comparison
    }

    /// Returns false if the city was already a favorite.
    pub fn add_favorite(&mut self, city: &str) -> bool {
        push_unique(&mut self.favorites, city)
    }

    pub fn remove_favorite(&mut self, city: &str) -> bool {
        remove(&mut self.favorites, city)
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.favorites.iter().any(|c| c == city.trim())
    }

    pub fn record_search(&mut self, city: &str) {
        push_unique(&mut self.history, city);
    }

    /// Up to the last five distinct searches, oldest first.
    pub fn recent_searches(&self) -> &[String] {
        let start = self.history.len().saturating_sub(RECENT_SEARCHES);
        &self.history[start..]
    }

    pub fn add_comparison(&mut self, city: &str) -> bool {
        push_unique(&mut self.comparison, city)
    }

    pub fn remove_comparison(&mut self, city: &str) -> bool {
        remove(&mut self.comparison, city)
    }

    pub fn clear_comparison(&mut self) {
        self.comparison.clear();
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = match self.unit {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        };
        self.unit
    }
}

fn push_unique(list: &mut Vec<String>, city: &str) -> bool {
    let city = city.trim();
    if city.is_empty() || list.iter().any(|c| c == city) {
        return false;
    }
    list.push(city.to_string());
    true
}

fn remove(list: &mut Vec<String>, city: &str) -> bool {
    let before = list.len();
    list.retain(|c| c != city.trim());
    list.len() != before
}
