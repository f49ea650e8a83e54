//! Data models for the weather dashboard
//!
//! This module contains the wire types served to the dashboard, organized by concern:
//! - Location: search suggestions and the location query addressing scheme
//! - Weather: current conditions, daily forecast entries and the combined bundle

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{LocationQuery, LocationSuggestion};
pub use weather::{Condition, CurrentConditions, DailyForecastEntry, MainReadings, WeatherBundle};
