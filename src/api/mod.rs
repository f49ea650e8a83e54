use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    config::ProviderConfig,
    error::ApiError,
    geocoding::GeocodingProxy,
    models::{LocationSuggestion, WeatherBundle},
    provider::{ApiKey, OpenWeatherMapClient, WeatherProvider},
    weather::WeatherProxy,
};

pub const LOCATIONS_FAILURE: &str = "Failed to fetch location suggestions";
pub const WEATHER_FAILURE: &str = "Failed to fetch weather data";

/// Proxies shared by every request
#[derive(Clone)]
pub struct AppState {
    pub geocoding: GeocodingProxy,
    pub weather: WeatherProxy,
}

impl AppState {
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>, api_key: Option<ApiKey>) -> Self {
        Self {
            geocoding: GeocodingProxy::new(provider.clone(), api_key.clone()),
            weather: WeatherProxy::new(provider, api_key),
        }
    }

    /// Wire both proxies to OpenWeatherMap
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = OpenWeatherMapClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.api_key()))
    }
}

/// Query string as ordered pairs. Repeated keys are kept so the first one wins.
pub type QueryPairs = Vec<(String, String)>;

pub const SEARCH_KEYS: [&str; 2] = ["search", "term"];
pub const LOCATION_KEYS: [&str; 1] = ["location"];

/// First value under any of `keys`, or empty when none is present
#[must_use]
pub fn first_param(pairs: &[(String, String)], keys: &[&str]) -> String {
    pairs
        .iter()
        .find(|(key, _)| keys.contains(&key.as_str()))
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/locations", get(search_locations))
        .route("/search", get(search_locations))
        .route("/weather", get(get_weather))
        .route("/health", get(health))
        .with_state(state)
}

async fn search_locations(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> std::result::Result<Json<Vec<LocationSuggestion>>, ApiError> {
    let term = first_param(&params, &SEARCH_KEYS);
    let suggestions = state
        .geocoding
        .search(&term)
        .await
        .map_err(|e| ApiError::new(e, LOCATIONS_FAILURE))?;
    Ok(Json(suggestions))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> std::result::Result<Json<WeatherBundle>, ApiError> {
    let location = first_param(&params, &LOCATION_KEYS);
    let bundle = state
        .weather
        .fetch_weather(&location)
        .await
        .map_err(|e| ApiError::new(e, WEATHER_FAILURE))?;
    Ok(Json(bundle))
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
