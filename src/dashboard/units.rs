//! Temperature unit preference
//!
//! The proxies always answer in Fahrenheit; switching to Celsius is a
//! display-only conversion and never triggers a refetch.

use std::fmt;

use crate::models::weather::round_temperature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
        }
    }

    /// Convert a Fahrenheit reading into this unit, rounded to a whole degree
    #[must_use]
    pub fn convert(self, fahrenheit: f64) -> i32 {
        match self {
            TemperatureUnit::Fahrenheit => round_temperature(fahrenheit),
            TemperatureUnit::Celsius => round_temperature(fahrenheit_to_celsius(fahrenheit)),
        }
    }

    /// e.g. "21°C"
    #[must_use]
    pub fn format(self, fahrenheit: i32) -> String {
        format!("{}{}", self.convert(fahrenheit.into()), self.symbol())
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}
