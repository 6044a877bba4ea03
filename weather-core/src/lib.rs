//! Core library for the `weather` search client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and the combined current + forecast lookup
//! - Search history and its local persistence
//! - UI state, the reducer driving it, and the runtime executing its effects
//! - Presentation helpers (background classification, date labels, units)
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod background;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod provider;
pub mod state;

pub use app::WeatherApp;
pub use background::Background;
pub use config::Config;
pub use error::{LOOKUP_FAILED_MESSAGE, WeatherError};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, SearchHistory};
pub use model::{Condition, Forecast, ForecastEntry, WeatherReport, WeatherSnapshot};
pub use provider::{WeatherProvider, fetch_report, provider_from_config};
pub use state::{Action, Effect, UiState, reduce};
