//! Location models: search suggestions and weather lookup targets

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// One entry of the search suggestion list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationSuggestion {
    /// Place name
    pub name: String,
    /// State or region, when the provider knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// `"lat,lon"`; the dashboard feeds this straight back as a [`LocationQuery`]
    #[serde(rename = "zip")]
    pub coordinate_key: String,
}

impl LocationSuggestion {
    /// Build a suggestion, encoding the coordinates into the key
    #[must_use]
    pub fn new(
        name: String,
        state: Option<String>,
        country: String,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name,
            state,
            country,
            coordinate_key: format!("{latitude},{longitude}"),
        }
    }

    /// Label shown in the suggestion list, e.g. "San Jose, CA, US"
    #[must_use]
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Where to look up weather: a postal code or a `"lat,lon"` pair.
///
/// Any comma makes the query a coordinate pair. The parts are not validated
/// and reach the provider as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    Coordinates { latitude: String, longitude: String },
    PostalCode(String),
}

impl LocationQuery {
    /// Parse a raw query string; fails only when it is empty
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DashboardError::validation("Location is required"));
        }

        if raw.contains(',') {
            let mut parts = raw.split(',');
            let latitude = parts.next().unwrap_or_default().trim().to_string();
            let longitude = parts.next().unwrap_or_default().trim().to_string();
            Ok(Self::Coordinates {
                latitude,
                longitude,
            })
        } else {
            Ok(Self::PostalCode(raw.to_string()))
        }
    }

    #[must_use]
    pub fn is_coordinates(&self) -> bool {
        matches!(self, Self::Coordinates { .. })
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{latitude},{longitude}"),
            Self::PostalCode(code) => write!(f, "{code}"),
        }
    }
}
