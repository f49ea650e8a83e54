//! OpenWeatherMap HTTP client
//!
//! Issues exactly one request per call. There is no retry, rate limiting or
//! caching; any failure surfaces as [`DashboardError::Upstream`].

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::{ApiKey, CurrentWeatherResponse, ForecastResponse, GeocodedPlace, WeatherProvider};
use crate::config::ProviderConfig;
use crate::models::LocationQuery;
use crate::{DashboardError, Result};

const USER_AGENT: &str = concat!("weather-dashboard/", env!("CARGO_PKG_VERSION"));

/// Weather API client for OpenWeatherMap
#[derive(Debug, Clone)]
pub struct OpenWeatherMapClient {
    client: Client,
    geo_base_url: String,
    data_base_url: String,
    units: String,
    country_code: String,
}

impl OpenWeatherMapClient {
    /// Create a new client from the provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            geo_base_url: config.geo_base_url.trim_end_matches('/').to_string(),
            data_base_url: config.data_base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            country_code: config.country_code.clone(),
        })
    }

    /// Query-string fragment addressing a location
    fn location_params(&self, location: &LocationQuery) -> String {
        match location {
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => format!(
                "lat={}&lon={}",
                urlencoding::encode(latitude),
                urlencoding::encode(longitude)
            ),
            LocationQuery::PostalCode(code) => format!(
                "zip={},{}",
                urlencoding::encode(code),
                self.country_code.to_lowercase()
            ),
        }
    }

    fn data_url(&self, endpoint: &str, api_key: &ApiKey, location: &LocationQuery) -> String {
        // appid goes last so the logged prefix never contains it
        format!(
            "{}/{}?{}&units={}&appid={}",
            self.data_base_url,
            endpoint,
            self.location_params(location),
            self.units,
            urlencoding::encode(api_key.as_str())
        )
    }

    /// Make a single GET request and decode the JSON body
    #[instrument(skip(self, url), fields(url = %url.split("appid=").next().unwrap_or_default()))]
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let start_time = Instant::now();
        debug!("Making HTTP request");

        let response = self.client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            warn!("Network error calling provider: {}", e);
            DashboardError::upstream(format!("Request to provider failed: {e}"))
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            warn!("Provider request failed with status {}", status);
            return Err(DashboardError::upstream(format!(
                "Provider answered with status {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            warn!("Failed to parse provider response: {}", e);
            DashboardError::upstream(format!("Invalid response from provider: {e}"))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    #[instrument(skip(self, api_key))]
    async fn direct_geocode(
        &self,
        api_key: &ApiKey,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodedPlace>> {
        let url = format!(
            "{}/direct?q={},{}&limit={}&appid={}",
            self.geo_base_url,
            urlencoding::encode(query),
            self.country_code,
            limit,
            urlencoding::encode(api_key.as_str())
        );

        let places: Vec<GeocodedPlace> = self.get_json(&url).await?;
        info!("Found {} geocoding results for '{}'", places.len(), query);
        Ok(places)
    }

    #[instrument(skip(self, api_key), fields(location = %location))]
    async fn current_weather(
        &self,
        api_key: &ApiKey,
        location: &LocationQuery,
    ) -> Result<CurrentWeatherResponse> {
        let url = self.data_url("weather", api_key, location);
        self.get_json(&url).await
    }

    #[instrument(skip(self, api_key), fields(location = %location))]
    async fn forecast(
        &self,
        api_key: &ApiKey,
        location: &LocationQuery,
    ) -> Result<ForecastResponse> {
        let url = self.data_url("forecast", api_key, location);
        let forecast: ForecastResponse = self.get_json(&url).await?;
        debug!("Forecast contains {} data points", forecast.list.len());
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherMapClient {
        let config = ProviderConfig {
            geo_base_url: format!("{}/geo/1.0", server.uri()),
            data_base_url: format!("{}/data/2.5", server.uri()),
            ..ProviderConfig::default()
        };
        OpenWeatherMapClient::new(&config).unwrap()
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key".to_string())
    }

    #[test]
    fn test_location_params() {
        let client = OpenWeatherMapClient::new(&ProviderConfig::default()).unwrap();

        let coords = LocationQuery::parse("37.33,-121.88").unwrap();
        assert_eq!(client.location_params(&coords), "lat=37.33&lon=-121.88");

        let zip = LocationQuery::parse("95125").unwrap();
        assert_eq!(client.location_params(&zip), "zip=95125,us");
    }

    #[test]
    fn test_data_url_puts_key_last() {
        let client = OpenWeatherMapClient::new(&ProviderConfig::default()).unwrap();
        let url = client.data_url("weather", &key(), &LocationQuery::parse("95125").unwrap());
        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?zip=95125,us&units=imperial&appid=test-key"
        );
        assert!(!url.split("appid=").next().unwrap().contains("test-key"));
    }

    #[tokio::test]
    async fn test_direct_geocode_request_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "San,US"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "San Jose", "state": "CA", "country": "US", "lat": 37.33, "lon": -121.88}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let places = client_for(&server)
            .direct_geocode(&key(), "San", 5)
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "San Jose");
        assert_eq!(places[0].state.as_deref(), Some("CA"));
    }

    #[tokio::test]
    async fn test_current_weather_by_coordinates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "37.33"))
            .and(query_param("lon", "-121.88"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 70.2, "humidity": 40, "temp_min": 66.0, "temp_max": 74.8},
                "weather": [{"description": "clear sky", "icon": "01d"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let location = LocationQuery::parse("37.33,-121.88").unwrap();
        let current = client_for(&server)
            .current_weather(&key(), &location)
            .await
            .unwrap();

        assert_eq!(current.main.temp, 70.2);
        assert_eq!(current.weather[0].description, "clear sky");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401, "message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let location = LocationQuery::parse("95125").unwrap();
        let err = client_for(&server)
            .forecast(&key(), &location)
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let location = LocationQuery::parse("95125").unwrap();
        let err = client_for(&server)
            .current_weather(&key(), &location)
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_upstream_error() {
        let config = ProviderConfig {
            data_base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..ProviderConfig::default()
        };
        let client = OpenWeatherMapClient::new(&config).unwrap();

        let location = LocationQuery::parse("95125").unwrap();
        let err = client.current_weather(&key(), &location).await.unwrap_err();

        assert!(matches!(err, DashboardError::Upstream { .. }));
        assert!(!err.to_string().contains("test-key"));
    }
}
