//! Weather bundle served to the dashboard

use serde::{Deserialize, Serialize};

/// Base of the provider's condition icon images
pub const ICON_BASE_URL: &str = "http://openweathermap.org/img/w";

/// Image URL for a provider icon code such as `"04d"`
#[must_use]
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}.png")
}

/// Round to the nearest whole unit, halves going up (`-2.5` becomes `-2`)
#[must_use]
pub fn round_temperature(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Everything the weather panel shows for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    /// One entry per day, oldest first
    pub forecast: Vec<DailyForecastEntry>,
}

/// Conditions right now
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    pub main: MainReadings,
    /// Primary condition only; empty when the provider reported none
    pub weather: Vec<Condition>,
}

impl CurrentConditions {
    /// The primary condition, if any
    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MainReadings {
    pub temp: i32,
    /// Relative humidity in percent
    pub humidity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<i32>,
}

/// A weather condition as the provider describes it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

impl Condition {
    #[must_use]
    pub fn icon_url(&self) -> Option<String> {
        (!self.icon.is_empty()).then(|| icon_url(&self.icon))
    }
}

/// One representative reading for a forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecastEntry {
    /// e.g. "Mon, Jan 15"
    pub date: String,
    pub temp: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<i32>,
    pub icon: String,
    pub description: String,
}
