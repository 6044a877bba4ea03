use reqwest::StatusCode;
use thiserror::Error;

/// The only message a user ever sees for a failed lookup.
pub const LOOKUP_FAILED_MESSAGE: &str = "City not found. Please check spelling and try again.";

/// Everything that can go wrong while looking up a city.
///
/// The distinction only matters for diagnostics; the UI collapses every
/// variant into [`LOOKUP_FAILED_MESSAGE`].
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("city '{0}' was not found by the provider")]
    CityNotFound(String),

    #[error("provider request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to reach the weather provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error(
        "no API key configured.\n\
         Hint: run `weather configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        LOOKUP_FAILED_MESSAGE
    }
}
