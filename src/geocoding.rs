//! Geocoding proxy
//!
//! Turns a free-text search into the suggestion list the dashboard shows
//! under its search box.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::models::LocationSuggestion;
use crate::provider::{ApiKey, GeocodedPlace, WeatherProvider};
use crate::{DashboardError, Result};

/// Upper bound on suggestions requested from the provider
pub const MAX_SUGGESTIONS: u8 = 5;

impl From<GeocodedPlace> for LocationSuggestion {
    fn from(place: GeocodedPlace) -> Self {
        LocationSuggestion::new(place.name, place.state, place.country, place.lat, place.lon)
    }
}

/// Forwards location searches to the provider
#[derive(Clone)]
pub struct GeocodingProxy {
    provider: Arc<dyn WeatherProvider>,
    api_key: Option<ApiKey>,
}

impl GeocodingProxy {
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>, api_key: Option<ApiKey>) -> Self {
        Self { provider, api_key }
    }

    /// Search for places matching `term`, best match first
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<LocationSuggestion>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DashboardError::validation("Search term is required"));
        }
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(DashboardError::missing_api_key)?;

        debug!("Geocoding search term");
        let places = self
            .provider
            .direct_geocode(api_key, term, MAX_SUGGESTIONS)
            .await?;

        let suggestions: Vec<LocationSuggestion> =
            places.into_iter().map(LocationSuggestion::from).collect();
        info!("Returning {} location suggestions", suggestions.len());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationQuery;
    use crate::provider::{CurrentWeatherResponse, ForecastResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider stub answering geocoding calls from a fixed list
    struct StubGeocoder {
        places: Vec<GeocodedPlace>,
        fail: bool,
        calls: Mutex<Vec<(String, u8)>>,
    }

    impl StubGeocoder {
        fn with_places(places: Vec<GeocodedPlace>) -> Arc<Self> {
            Arc::new(Self {
                places,
                fail: false,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                places: Vec::new(),
                fail: true,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl WeatherProvider for StubGeocoder {
        async fn direct_geocode(
            &self,
            _api_key: &ApiKey,
            query: &str,
            limit: u8,
        ) -> Result<Vec<GeocodedPlace>> {
            self.calls.lock().unwrap().push((query.to_string(), limit));
            if self.fail {
                return Err(DashboardError::upstream("boom"));
            }
            Ok(self.places.clone())
        }

        async fn current_weather(
            &self,
            _api_key: &ApiKey,
            _location: &LocationQuery,
        ) -> Result<CurrentWeatherResponse> {
            unreachable!("geocoding never asks for weather")
        }

        async fn forecast(
            &self,
            _api_key: &ApiKey,
            _location: &LocationQuery,
        ) -> Result<ForecastResponse> {
            unreachable!("geocoding never asks for a forecast")
        }
    }

    fn place(name: &str, state: Option<&str>, lat: f64, lon: f64) -> GeocodedPlace {
        GeocodedPlace {
            name: name.to_string(),
            state: state.map(str::to_string),
            country: "US".to_string(),
            lat,
            lon,
        }
    }

    fn key() -> Option<ApiKey> {
        Some(ApiKey::new("test-key".to_string()))
    }

    #[tokio::test]
    async fn test_search_maps_san_jose() {
        let stub = StubGeocoder::with_places(vec![place("San Jose", Some("CA"), 37.33, -121.88)]);
        let proxy = GeocodingProxy::new(stub.clone(), key());

        let suggestions = proxy.search("San").await.unwrap();

        assert_eq!(
            suggestions,
            vec![LocationSuggestion {
                name: "San Jose".to_string(),
                state: Some("CA".to_string()),
                country: "US".to_string(),
                coordinate_key: "37.33,-121.88".to_string(),
            }]
        );
        assert_eq!(
            stub.calls.lock().unwrap().as_slice(),
            &[("San".to_string(), MAX_SUGGESTIONS)]
        );
    }

    #[tokio::test]
    async fn test_search_preserves_order_and_count() {
        let places = vec![
            place("Springfield", Some("IL"), 39.8, -89.65),
            place("Springfield", Some("MO"), 37.21, -93.29),
            place("Springfield", Some("MA"), 42.1, -72.59),
        ];
        let proxy = GeocodingProxy::new(StubGeocoder::with_places(places), key());

        let suggestions = proxy.search("Springfield").await.unwrap();

        let states: Vec<_> = suggestions
            .iter()
            .map(|s| s.state.clone().unwrap_or_default())
            .collect();
        assert_eq!(states, vec!["IL", "MO", "MA"]);
    }

    #[tokio::test]
    async fn test_empty_term_is_rejected_before_credential_check() {
        let proxy = GeocodingProxy::new(StubGeocoder::with_places(vec![]), None);
        let err = proxy.search("").await.unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));

        let proxy = GeocodingProxy::new(StubGeocoder::with_places(vec![]), key());
        let err = proxy.search("  ").await.unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_missing_credential_is_config_error() {
        let stub = StubGeocoder::with_places(vec![]);
        let proxy = GeocodingProxy::new(stub.clone(), None);

        let err = proxy.search("San").await.unwrap_err();

        assert!(matches!(err, DashboardError::Config { .. }));
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let proxy = GeocodingProxy::new(StubGeocoder::failing(), key());
        let err = proxy.search("San").await.unwrap_err();
        assert!(matches!(err, DashboardError::Upstream { .. }));
    }
}
