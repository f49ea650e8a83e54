//! HTTP client for the dashboard's two proxy endpoints

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::models::{LocationSuggestion, WeatherBundle};
use crate::{DashboardError, Result};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
}

impl DashboardClient {
    /// `base_url` points at the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn search_locations(&self, term: &str) -> Result<Vec<LocationSuggestion>> {
        let url = format!(
            "{}/locations?search={}",
            self.base_url,
            urlencoding::encode(term)
        );
        self.get_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_weather(&self, location: &str) -> Result<WeatherBundle> {
        let url = format!(
            "{}/weather?location={}",
            self.base_url,
            urlencoding::encode(location)
        );
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "Calling dashboard API");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DashboardError::upstream(format!("Dashboard API unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(if status.is_client_error() {
                DashboardError::validation(message)
            } else {
                DashboardError::upstream(message)
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DashboardError::upstream(format!("Invalid dashboard API response: {e}")))
    }
}
