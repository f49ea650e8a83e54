//! Client-side dashboard state
//!
//! Pure state transitions; the caller performs the network calls the
//! transitions ask for and feeds the results back in.

use crate::models::{LocationSuggestion, WeatherBundle};

use super::units::TemperatureUnit;

/// Searches shorter than this clear the suggestion list instead of fetching
pub const MIN_SEARCH_CHARS: usize = 2;

pub const WEATHER_FAILURE_MESSAGE: &str = "Failed to fetch weather data";

/// Identifies one outgoing request; only the most recent one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    fn invalidate(&mut self) {
        self.latest += 1;
    }

    fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// What the weather panel currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherView {
    Loading,
    Ready(WeatherBundle),
    Failed(String),
}

#[derive(Debug)]
pub struct DashboardState {
    pub unit: TemperatureUnit,
    /// Postal code or `"lat,lon"` of the selected location
    pub location: String,
    pub city_name: String,
    pub search_text: String,
    pub suggestions: Vec<LocationSuggestion>,
    pub show_suggestions: bool,
    pub weather: WeatherView,
    suggestion_requests: RequestSequence,
    weather_requests: RequestSequence,
}

impl DashboardState {
    #[must_use]
    pub fn new(location: impl Into<String>, city_name: impl Into<String>) -> Self {
        Self {
            unit: TemperatureUnit::default(),
            location: location.into(),
            city_name: city_name.into(),
            search_text: String::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            weather: WeatherView::Loading,
            suggestion_requests: RequestSequence::default(),
            weather_requests: RequestSequence::default(),
        }
    }

    /// Record a keystroke; the caller restarts its debounce timer
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Called when the debounce period has elapsed for `text`.
    ///
    /// Returns the token and term to search for, or `None` when the text is
    /// too short, in which case the suggestion list is cleared and any
    /// in-flight search is invalidated.
    pub fn search_settled(&mut self, text: &str) -> Option<(RequestToken, String)> {
        if text.chars().count() < MIN_SEARCH_CHARS {
            self.suggestion_requests.invalidate();
            self.suggestions.clear();
            return None;
        }
        Some((self.suggestion_requests.issue(), text.to_string()))
    }

    /// Apply a suggestion response; stale responses are dropped.
    pub fn apply_suggestions(
        &mut self,
        token: RequestToken,
        suggestions: Vec<LocationSuggestion>,
    ) -> bool {
        if !self.suggestion_requests.is_latest(token) {
            tracing::debug!(?token, "discarding stale suggestions");
            return false;
        }
        self.suggestions = suggestions;
        self.show_suggestions = true;
        true
    }

    /// Pick a suggestion by index. Returns the new location query when the
    /// location changed and weather must be refetched.
    pub fn select_suggestion(&mut self, index: usize) -> Option<String> {
        let suggestion = self.suggestions.get(index)?.clone();
        self.location = suggestion.coordinate_key;
        self.search_text = suggestion.name.clone();
        self.city_name = suggestion.name;
        self.show_suggestions = false;
        self.suggestions.clear();
        // pending searches for the old text must not reopen the list
        self.suggestion_requests.invalidate();
        Some(self.location.clone())
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    /// Start a weather fetch for the current location
    pub fn begin_weather_fetch(&mut self) -> (RequestToken, String) {
        self.weather = WeatherView::Loading;
        (self.weather_requests.issue(), self.location.clone())
    }

    /// Apply a weather response; the whole bundle is replaced, never merged.
    pub fn apply_weather<E: std::fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<WeatherBundle, E>,
    ) -> bool {
        if !self.weather_requests.is_latest(token) {
            return false;
        }
        self.weather = match result {
            Ok(bundle) => WeatherView::Ready(bundle),
            Err(e) => {
                tracing::warn!("Weather fetch failed: {}", e);
                WeatherView::Failed(WEATHER_FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    /// Format a Fahrenheit reading in the selected unit
    #[must_use]
    pub fn temperature(&self, fahrenheit: i32) -> String {
        self.unit.format(fahrenheit)
    }
}
