//! Client side of the dashboard
//!
//! State transitions, debounced search, clock and rendering live here and
//! are driven by the terminal front end in [`terminal`]. The browser page in
//! `frontend/index.html` implements the same behaviour against the same API.

pub mod client;
pub mod clock;
pub mod debounce;
pub mod state;
pub mod terminal;
pub mod units;
pub mod view;

pub use client::DashboardClient;
pub use clock::Clock;
pub use debounce::Debouncer;
pub use state::{DashboardState, RequestToken, WeatherView};
pub use units::TemperatureUnit;
