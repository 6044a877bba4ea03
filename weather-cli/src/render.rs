//! Plain-text rendering of [`UiState`].

use weather_core::{
    ForecastEntry, SearchHistory, UiState, WeatherSnapshot,
    format::{icon_url, round_half_up, short_date_label, visibility_km, wind_kmh},
};

const WELCOME_TITLE: &str = "Welcome to Weather Forecast";
const WELCOME_BODY: &str = "Enter a city name to get the current weather and 5-day forecast";

/// Whole screen: error, history chips, then results or the welcome message.
/// `today` is the long date label shown in the results header.
pub fn render_state(state: &UiState, today: &str) -> String {
    let mut out = String::from("\n== Weather Forecast ==\n");

    if let Some(error) = &state.error {
        out.push_str(&format!("! {error}\n"));
    }
    if !state.history.is_empty() {
        out.push_str(&format!("Recent: {}\n", render_chips(&state.history)));
    }

    if let Some(snapshot) = &state.weather {
        out.push('\n');
        out.push_str(&render_current(snapshot, today));
        out.push_str(&format!("  Scene: {}\n", state.background()));

        if !state.forecast.is_empty() {
            out.push_str("\n5-Day Forecast\n");
            for entry in &state.forecast {
                out.push_str(&render_forecast_card(entry));
            }
        }
    } else if state.is_welcome() {
        out.push_str(&format!("\n{WELCOME_TITLE}\n{WELCOME_BODY}\n"));
    }

    out
}

pub fn render_chips(history: &SearchHistory) -> String {
    history
        .entries()
        .iter()
        .map(|city| format!("[{city}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_current(snapshot: &WeatherSnapshot, today: &str) -> String {
    let mut lines = vec![
        format!("{}, {}", snapshot.location_name, snapshot.country),
        today.to_string(),
        format!(
            "  {}°C (feels like {}°C)",
            round_half_up(snapshot.temperature_c),
            round_half_up(snapshot.feels_like_c)
        ),
    ];
    if let Some(condition) = snapshot.primary_condition() {
        lines.push(format!(
            "  {}  {}",
            condition.description,
            icon_url(&condition.icon, true)
        ));
    }
    lines.push(format!("  Humidity:   {}%", snapshot.humidity_pct));
    lines.push(format!("  Wind:       {} km/h", wind_kmh(snapshot.wind_speed_mps)));
    lines.push(format!("  Pressure:   {} hPa", snapshot.pressure_hpa));
    lines.push(match snapshot.visibility_m {
        Some(m) => format!("  Visibility: {} km", visibility_km(m)),
        None => "  Visibility: n/a".to_string(),
    });

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_forecast_card(entry: &ForecastEntry) -> String {
    let date = short_date_label(entry.timestamp).unwrap_or_else(|| entry.timestamp.to_string());
    format!(
        "  {date:<12} {:>3}° / {:>3}°  {:<20} {}% humidity, {} km/h\n",
        round_half_up(entry.temp_max_c),
        round_half_up(entry.temp_min_c),
        entry.condition.description,
        entry.humidity_pct,
        wind_kmh(entry.wind_speed_mps),
    )
}
