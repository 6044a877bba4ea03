//! UI state and the reducer that drives it.
//!
//! `reduce` is the only place state changes. It performs no I/O: anything
//! that has to touch the network or disk is returned as an [`Effect`] for the
//! runtime in [`crate::app`] to carry out, and the outcome comes back as
//! another [`Action`].

use crate::{
    background::Background,
    error::LOOKUP_FAILED_MESSAGE,
    history::SearchHistory,
    model::{Forecast, WeatherReport, WeatherSnapshot},
};

/// Everything the front end needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Text in the search box.
    pub query: String,
    pub is_loading: bool,
    /// User-facing message for the last failed lookup.
    pub error: Option<String>,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Forecast,
    pub history: SearchHistory,
    /// Stamp of the most recently submitted search. Results carrying any
    /// other value are stale and get dropped.
    pub generation: u64,
}

impl UiState {
    pub fn background(&self) -> Background {
        Background::for_snapshot(self.weather.as_ref())
    }

    /// Nothing to show yet: no data, no pending search, no error.
    pub fn is_welcome(&self) -> bool {
        self.weather.is_none() && !self.is_loading && self.error.is_none()
    }

    pub fn search_label(&self) -> &'static str {
        if self.is_loading { "Searching..." } else { "Search" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Persisted history restored at startup.
    HistoryDidLoad(SearchHistory),

    /// The search box text changed.
    QueryChange(String),

    /// Search for the given city, or for the current query when `None`
    /// (Enter key / search button). Picking a history chip passes the city.
    SearchSubmit(Option<String>),

    /// Both lookups for `city` succeeded.
    WeatherDidLoad {
        generation: u64,
        city: String,
        report: WeatherReport,
    },

    /// The lookup for `city` failed; the cause has already been logged.
    WeatherDidError { generation: u64, city: String },
}

impl Action {
    /// Short form for logs; avoids dumping whole reports.
    pub fn summary(&self) -> String {
        match self {
            Action::WeatherDidLoad {
                generation,
                city,
                report,
            } => format!(
                "WeatherDidLoad {{ generation: {generation}, city: {city:?}, temp: {:.1}°C, days: {} }}",
                report.snapshot.temperature_c,
                report.forecast.len()
            ),
            _ => format!("{self:?}"),
        }
    }
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up `city`; answer with `WeatherDidLoad`/`WeatherDidError`
    /// carrying the same `generation`.
    FetchWeather { city: String, generation: u64 },

    /// Overwrite persisted history.
    PersistHistory(SearchHistory),
}

/// Pure transition: `(state, action) -> (state, effects)`.
pub fn reduce(mut state: UiState, action: Action) -> (UiState, Vec<Effect>) {
    match action {
        Action::HistoryDidLoad(history) => {
            state.history = history;
            match state.history.most_recent().map(str::to_string) {
                Some(city) => reduce(state, Action::SearchSubmit(Some(city))),
                None => (state, Vec::new()),
            }
        }

        Action::QueryChange(query) => {
            state.query = query;
            (state, Vec::new())
        }

        Action::SearchSubmit(city) => {
            let requested = city.as_deref().unwrap_or(&state.query).trim().to_string();
            if requested.is_empty() {
                return (state, Vec::new());
            }

            if let Some(city) = city {
                state.query = city;
            }
            state.generation += 1;
            state.is_loading = true;
            state.error = None;

            let effect = Effect::FetchWeather {
                city: requested,
                generation: state.generation,
            };
            (state, vec![effect])
        }

        Action::WeatherDidLoad {
            generation,
            city,
            report,
        } => {
            if generation != state.generation {
                return (state, Vec::new());
            }

            state.weather = Some(report.snapshot);
            state.forecast = report.forecast;
            state.history = state.history.with_recorded(&city);
            state.is_loading = false;
            state.error = None;

            let effect = Effect::PersistHistory(state.history.clone());
            (state, vec![effect])
        }

        Action::WeatherDidError { generation, .. } => {
            if generation != state.generation {
                return (state, Vec::new());
            }

            state.is_loading = false;
            state.error = Some(LOOKUP_FAILED_MESSAGE.to_string());
            (state, Vec::new())
        }
    }
}
