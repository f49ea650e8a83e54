//! Plain-text rendering of the dashboard

use super::state::{DashboardState, WeatherView};

/// Render the weather panel and suggestion list below a clock line
#[must_use]
pub fn render(state: &DashboardState, clock: &str) -> String {
    let mut lines = vec![format!("Current Time: {clock}"), String::new()];

    match &state.weather {
        WeatherView::Loading => lines.push("Loading weather data...".to_string()),
        WeatherView::Failed(message) => lines.push(message.clone()),
        WeatherView::Ready(bundle) => {
            let current = &bundle.current;
            let condition = current.condition();
            lines.push(format!(
                "Current Weather for {} [{}]",
                state.city_name, state.unit
            ));
            lines.push(format!(
                "  {}  {}",
                state.temperature(current.main.temp),
                condition.map_or("", |c| c.description.as_str())
            ));
            lines.push(format!("  Humidity: {}%", current.main.humidity));
            if let Some(high_low) = high_low(state, current.main.temp_max, current.main.temp_min) {
                lines.push(format!("  {high_low}"));
            }
            if let Some(icon) = condition.and_then(|c| c.icon_url()) {
                lines.push(format!("  {icon}"));
            }

            lines.push(String::new());
            lines.push(format!("{}-Day Forecast", bundle.forecast.len()));
            for day in &bundle.forecast {
                let extremes = high_low(state, day.temp_max, day.temp_min)
                    .map(|hl| format!("  {hl}"))
                    .unwrap_or_default();
                lines.push(format!(
                    "  {:<12} {:>6}{}  {}",
                    day.date,
                    state.temperature(day.temp),
                    extremes,
                    day.description
                ));
            }
        }
    }

    if state.show_suggestions && !state.suggestions.is_empty() {
        lines.push(String::new());
        lines.push("Suggestions (type :<number> to select):".to_string());
        lines.extend(
            state
                .suggestions
                .iter()
                .enumerate()
                .map(|(i, suggestion)| format!("  {}. {}", i + 1, suggestion.label())),
        );
    }

    lines.push(String::new());
    lines.join("\n")
}

fn high_low(state: &DashboardState, high: Option<i32>, low: Option<i32>) -> Option<String> {
    Some(format!(
        "H: {} L: {}",
        state.temperature(high?),
        state.temperature(low?)
    ))
}
