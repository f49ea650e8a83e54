//! Line-oriented terminal front end for the dashboard
//!
//! Any line typed is treated as new search text. Lines starting with `:`
//! are commands, see [`Command`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::models::{LocationSuggestion, WeatherBundle};

use super::client::DashboardClient;
use super::clock::{Clock, TICK, format_time};
use super::debounce::Debouncer;
use super::state::{DashboardState, RequestToken};
use super::units::TemperatureUnit;
use super::view;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:<n>` picks the n-th suggestion, counting from 1
    Select(usize),
    /// `:c` / `:f`
    Unit(TemperatureUnit),
    /// `:r` refetches weather for the current location
    Refresh,
    /// `:q`
    Quit,
    /// Anything else replaces the search text
    Search(String),
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return Command::Search(line.to_string());
        };

        match command.trim() {
            "c" | "C" => Command::Unit(TemperatureUnit::Celsius),
            "f" | "F" => Command::Unit(TemperatureUnit::Fahrenheit),
            "r" => Command::Refresh,
            "q" => Command::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Command::Select(n - 1),
                _ => Command::Search(line.to_string()),
            },
        }
    }
}

enum Event {
    Suggestions(RequestToken, crate::Result<Vec<LocationSuggestion>>),
    Weather(RequestToken, crate::Result<WeatherBundle>),
}

struct Dashboard {
    state: DashboardState,
    client: Arc<DashboardClient>,
    events: mpsc::UnboundedSender<Event>,
}

impl Dashboard {
    fn fetch_weather(&mut self) {
        let (token, location) = self.state.begin_weather_fetch();
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.fetch_weather(&location).await;
            let _ = events.send(Event::Weather(token, result));
        });
    }

    fn search(&mut self, text: &str) {
        let Some((token, term)) = self.state.search_settled(text) else {
            return;
        };
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.search_locations(&term).await;
            let _ = events.send(Event::Suggestions(token, result));
        });
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::Suggestions(token, Ok(suggestions)) => {
                self.state.apply_suggestions(token, suggestions);
            }
            Event::Suggestions(token, Err(e)) => {
                // a failed search leaves the list as it was
                debug!(?token, "Location search failed: {}", e);
            }
            Event::Weather(token, result) => {
                self.state.apply_weather(token, result);
            }
        }
    }
}

/// Run the terminal dashboard until `:q` or end of input
pub async fn run(config: &ClientConfig) -> Result<()> {
    let client = DashboardClient::new(&config.api_base_url)
        .context("Failed to create dashboard client")?;
    info!(api = %config.api_base_url, "Starting terminal dashboard");

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut dashboard = Dashboard {
        state: DashboardState::new(&config.default_location, &config.default_city),
        client: Arc::new(client),
        events: events_tx,
    };
    let (mut debouncer, mut settled) = Debouncer::new(Duration::from_millis(config.debounce_millis));
    let (_clock, clock_rx) = Clock::start(TICK);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    dashboard.fetch_weather();
    redraw(&mut stdout, &dashboard.state, &clock_rx).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Search(text) => {
                        dashboard.state.set_search_text(text.clone());
                        debouncer.trigger(text);
                    }
                    Command::Select(index) => {
                        debouncer.cancel();
                        if dashboard.state.select_suggestion(index).is_some() {
                            dashboard.fetch_weather();
                        }
                    }
                    Command::Unit(unit) => dashboard.state.set_unit(unit),
                    Command::Refresh => dashboard.fetch_weather(),
                }
            }
            Some(text) = settled.recv() => dashboard.search(&text),
            Some(event) = events_rx.recv() => dashboard.apply(event),
        }
        redraw(&mut stdout, &dashboard.state, &clock_rx).await?;
    }

    Ok(())
}

async fn redraw(
    stdout: &mut tokio::io::Stdout,
    state: &DashboardState,
    clock: &tokio::sync::watch::Receiver<chrono::DateTime<chrono::Local>>,
) -> Result<()> {
    let now = format_time(&*clock.borrow());
    let panel = view::render(state, &now);
    stdout
        .write_all(format!("{CLEAR_SCREEN}{panel}\n> ").as_bytes())
        .await?;
    stdout.flush().await?;
    Ok(())
}
