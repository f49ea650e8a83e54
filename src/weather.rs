//! Weather proxy
//!
//! Fetches current conditions and the 3-hourly forecast for one location and
//! reshapes them into the [`WeatherBundle`] the dashboard renders.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use futures::future::try_join;
use tracing::{info, instrument};

use crate::models::weather::round_temperature;
use crate::models::{
    Condition, CurrentConditions, DailyForecastEntry, LocationQuery, MainReadings, WeatherBundle,
};
use crate::provider::{
    ApiKey, CurrentWeatherResponse, ForecastItem, ForecastResponse, MainBlock, WeatherCondition,
    WeatherProvider,
};
use crate::{DashboardError, Result};

/// Number of days shown in the forecast strip
pub const FORECAST_DAYS: usize = 5;

/// Forecast entries are 3 hours apart, so every 8th one starts a new day
pub const READINGS_PER_DAY: usize = 8;

/// Keep indices `0, 8, 16, ...` and stop after [`FORECAST_DAYS`] entries.
///
/// This is a fixed-offset sample, not a daily min/max/mean.
pub fn downsample_daily<T>(readings: Vec<T>) -> Vec<T> {
    readings
        .into_iter()
        .step_by(READINGS_PER_DAY)
        .take(FORECAST_DAYS)
        .collect()
}

/// Format a forecast timestamp as "Mon, Jan 15" in the location's local time
#[must_use]
pub fn format_forecast_date(timestamp: i64, utc_offset_seconds: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(utc_offset_seconds)?;
    let datetime = DateTime::from_timestamp(timestamp, 0)?.with_timezone(&offset);
    Some(datetime.format("%a, %b %-d").to_string())
}

/// Forwards weather lookups to the provider
#[derive(Clone)]
pub struct WeatherProxy {
    provider: Arc<dyn WeatherProvider>,
    api_key: Option<ApiKey>,
}

impl WeatherProxy {
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>, api_key: Option<ApiKey>) -> Self {
        Self { provider, api_key }
    }

    /// Fetch current conditions and the daily forecast for a postal code or `"lat,lon"`
    #[instrument(skip(self))]
    pub async fn fetch_weather(&self, location: &str) -> Result<WeatherBundle> {
        let location = LocationQuery::parse(location)?;
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(DashboardError::missing_api_key)?;

        let (current, forecast) = try_join(
            self.provider.current_weather(api_key, &location),
            self.provider.forecast(api_key, &location),
        )
        .await?;

        let bundle = WeatherBundle {
            current: shape_current(current),
            forecast: shape_forecast(forecast)?,
        };

        info!(
            "Weather for {} has {} forecast days",
            location,
            bundle.forecast.len()
        );
        Ok(bundle)
    }
}

impl From<WeatherCondition> for Condition {
    fn from(condition: WeatherCondition) -> Self {
        Self {
            description: condition.description,
            icon: condition.icon,
        }
    }
}

fn shape_main(main: &MainBlock) -> MainReadings {
    MainReadings {
        temp: round_temperature(main.temp),
        humidity: main.humidity.round().clamp(0.0, 100.0) as u8,
        temp_min: main.temp_min.map(round_temperature),
        temp_max: main.temp_max.map(round_temperature),
    }
}

fn shape_current(current: CurrentWeatherResponse) -> CurrentConditions {
    CurrentConditions {
        main: shape_main(&current.main),
        weather: current
            .weather
            .into_iter()
            .take(1)
            .map(Condition::from)
            .collect(),
    }
}

fn shape_forecast_item(item: ForecastItem, utc_offset_seconds: i32) -> Result<DailyForecastEntry> {
    let date = format_forecast_date(item.dt, utc_offset_seconds).ok_or_else(|| {
        DashboardError::upstream(format!("Invalid forecast timestamp {}", item.dt))
    })?;
    let main = shape_main(&item.main);
    let condition = item.weather.into_iter().next().map(Condition::from);
    let (icon, description) = condition
        .map(|c| (c.icon, c.description))
        .unwrap_or_default();

    Ok(DailyForecastEntry {
        date,
        temp: main.temp,
        temp_min: main.temp_min,
        temp_max: main.temp_max,
        icon,
        description,
    })
}

fn shape_forecast(forecast: ForecastResponse) -> Result<Vec<DailyForecastEntry>> {
    let utc_offset_seconds = forecast.utc_offset_seconds();
    downsample_daily(forecast.list)
        .into_iter()
        .map(|item| shape_forecast_item(item, utc_offset_seconds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GeocodedPlace;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const JAN_15_2024_NOON_UTC: i64 = 1_705_320_000;

    /// Provider stub serving canned weather and recording lookups
    struct StubWeather {
        current_temp: f64,
        forecast_len: usize,
        fail_current: bool,
        lookups: Mutex<Vec<LocationQuery>>,
    }

    impl StubWeather {
        fn new(current_temp: f64, forecast_len: usize) -> Self {
            Self {
                current_temp,
                forecast_len,
                fail_current: false,
                lookups: Mutex::new(Vec::new()),
            }
        }
    }

    fn main_block(temp: f64) -> MainBlock {
        MainBlock {
            temp,
            humidity: 55.0,
            temp_min: Some(temp - 3.4),
            temp_max: Some(temp + 2.6),
        }
    }

    fn condition(description: &str, icon: &str) -> WeatherCondition {
        WeatherCondition {
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn direct_geocode(
            &self,
            _api_key: &ApiKey,
            _query: &str,
            _limit: u8,
        ) -> Result<Vec<GeocodedPlace>> {
            unreachable!("weather never geocodes")
        }

        async fn current_weather(
            &self,
            _api_key: &ApiKey,
            location: &LocationQuery,
        ) -> Result<CurrentWeatherResponse> {
            self.lookups.lock().unwrap().push(location.clone());
            if self.fail_current {
                return Err(DashboardError::upstream("current weather unavailable"));
            }
            Ok(CurrentWeatherResponse {
                main: main_block(self.current_temp),
                weather: vec![condition("haze", "50d"), condition("mist", "50n")],
            })
        }

        async fn forecast(
            &self,
            _api_key: &ApiKey,
            location: &LocationQuery,
        ) -> Result<ForecastResponse> {
            self.lookups.lock().unwrap().push(location.clone());
            let list = (0..self.forecast_len)
                .map(|i| ForecastItem {
                    dt: JAN_15_2024_NOON_UTC + (i as i64) * 3 * 3600,
                    main: main_block(60.0 + i as f64),
                    weather: vec![condition(&format!("reading {i}"), "01d")],
                })
                .collect();
            Ok(ForecastResponse { list, city: None })
        }
    }

    fn key() -> Option<ApiKey> {
        Some(ApiKey::new("test-key".to_string()))
    }

    #[test]
    fn test_downsample_forty_entries() {
        let indices: Vec<usize> = (0..40).collect();
        assert_eq!(downsample_daily(indices), vec![0, 8, 16, 24, 32]);
    }

    #[test]
    fn test_downsample_short_and_long_lists() {
        assert_eq!(downsample_daily((0..10).collect::<Vec<_>>()), vec![0, 8]);
        assert_eq!(
            downsample_daily((0..48).collect::<Vec<_>>()),
            vec![0, 8, 16, 24, 32]
        );
        assert!(downsample_daily(Vec::<u8>::new()).is_empty());
    }

    #[test]
    fn test_format_forecast_date() {
        assert_eq!(
            format_forecast_date(JAN_15_2024_NOON_UTC, 0).as_deref(),
            Some("Mon, Jan 15")
        );
        // 14 hours behind noon UTC is still the previous day locally
        assert_eq!(
            format_forecast_date(JAN_15_2024_NOON_UTC, -14 * 3600).as_deref(),
            Some("Sun, Jan 14")
        );
        assert!(format_forecast_date(JAN_15_2024_NOON_UTC, 100_000).is_none());
    }

    #[tokio::test]
    async fn test_fetch_weather_by_postal_code() {
        let stub = Arc::new(StubWeather::new(70.2, 40));
        let proxy = WeatherProxy::new(stub.clone(), key());

        let bundle = proxy.fetch_weather("95125").await.unwrap();

        assert_eq!(bundle.current.main.temp, 70);
        assert_eq!(bundle.current.main.temp_min, Some(67));
        assert_eq!(bundle.current.main.temp_max, Some(73));
        assert_eq!(bundle.current.main.humidity, 55);
        assert_eq!(bundle.current.weather.len(), 1);
        assert_eq!(bundle.current.weather[0].description, "haze");

        assert_eq!(bundle.forecast.len(), 5);
        let descriptions: Vec<_> = bundle.forecast.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["reading 0", "reading 8", "reading 16", "reading 24", "reading 32"]
        );
        assert_eq!(bundle.forecast[0].date, "Mon, Jan 15");
        assert_eq!(bundle.forecast[1].date, "Tue, Jan 16");
        assert_eq!(bundle.forecast[1].temp, 68);

        let lookups = stub.lookups.lock().unwrap();
        assert_eq!(lookups.len(), 2);
        assert!(
            lookups
                .iter()
                .all(|q| *q == LocationQuery::PostalCode("95125".to_string()))
        );
    }

    #[tokio::test]
    async fn test_fetch_weather_by_coordinates() {
        let stub = Arc::new(StubWeather::new(50.0, 8));
        let proxy = WeatherProxy::new(stub.clone(), key());

        let bundle = proxy.fetch_weather("37.33,-121.88").await.unwrap();
        assert_eq!(bundle.forecast.len(), 1);

        let lookups = stub.lookups.lock().unwrap();
        assert!(lookups.iter().all(|q| {
            *q == LocationQuery::Coordinates {
                latitude: "37.33".to_string(),
                longitude: "-121.88".to_string(),
            }
        }));
    }

    #[tokio::test]
    async fn test_missing_location_and_credential() {
        let proxy = WeatherProxy::new(Arc::new(StubWeather::new(50.0, 8)), None);
        let err = proxy.fetch_weather("").await.unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));

        let err = proxy.fetch_weather("95125").await.unwrap_err();
        assert!(matches!(err, DashboardError::Config { .. }));
    }

    #[tokio::test]
    async fn test_current_failure_fails_whole_bundle() {
        let mut stub = StubWeather::new(50.0, 40);
        stub.fail_current = true;
        let proxy = WeatherProxy::new(Arc::new(stub), key());

        let err = proxy.fetch_weather("95125").await.unwrap_err();
        assert!(matches!(err, DashboardError::Upstream { .. }));
    }

    #[test]
    fn test_forecast_item_without_condition() {
        let item = ForecastItem {
            dt: JAN_15_2024_NOON_UTC,
            main: MainBlock {
                temp: 68.6,
                humidity: 0.0,
                temp_min: None,
                temp_max: None,
            },
            weather: vec![],
        };
        let entry = shape_forecast_item(item, 0).unwrap();
        assert_eq!(entry.temp, 69);
        assert!(entry.icon.is_empty());
        assert!(entry.description.is_empty());
        assert!(entry.temp_max.is_none());
    }
}
