//! Weather provider seam
//!
//! The proxies talk to the provider through [`WeatherProvider`]; the
//! production implementation is [`OpenWeatherMapClient`]. The response types
//! mirror the provider's JSON and stay internal to the proxy layer.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;
use crate::models::LocationQuery;

pub mod openweathermap;

pub use openweathermap::OpenWeatherMapClient;

/// Provider credential. Never shows its value in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    inner: String,
}

impl ApiKey {
    #[must_use]
    pub fn new(key: String) -> Self {
        Self { inner: key }
    }

    /// The actual key, for placing on an outgoing request only
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

/// Calls the proxies make against the upstream weather service
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Direct name lookup restricted to the configured country
    async fn direct_geocode(
        &self,
        api_key: &ApiKey,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodedPlace>>;

    /// Current conditions at a location
    async fn current_weather(
        &self,
        api_key: &ApiKey,
        location: &LocationQuery,
    ) -> Result<CurrentWeatherResponse>;

    /// 5-day forecast in 3-hour steps
    async fn forecast(
        &self,
        api_key: &ApiKey,
        location: &LocationQuery,
    ) -> Result<ForecastResponse>;
}

/// Geocoding result from the direct lookup
#[derive(Debug, Deserialize, Clone)]
pub struct GeocodedPlace {
    pub name: String,
    /// State code (for US locations)
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurrentWeatherResponse {
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

/// Temperature and humidity block shared by current and forecast records
#[derive(Debug, Deserialize, Clone)]
pub struct MainBlock {
    pub temp: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastResponse {
    pub list: Vec<ForecastItem>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

impl ForecastResponse {
    /// Shift from UTC in seconds for the forecast location
    #[must_use]
    pub fn utc_offset_seconds(&self) -> i32 {
        self.city.as_ref().map_or(0, |city| city.timezone)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastItem {
    /// Seconds since the Unix epoch
    pub dt: i64,
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastCity {
    #[serde(default)]
    pub timezone: i32,
}
