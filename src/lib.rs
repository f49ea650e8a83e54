//! Weather & time dashboard
//!
//! A thin proxy in front of OpenWeatherMap: location search and a combined
//! current-plus-forecast lookup, served as JSON to a client-rendered
//! dashboard. The [`dashboard`] module holds the client side of that contract.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod provider;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use geocoding::GeocodingProxy;
pub use models::{LocationQuery, LocationSuggestion, WeatherBundle};
pub use provider::{ApiKey, OpenWeatherMapClient, WeatherProvider};
pub use weather::WeatherProxy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;
