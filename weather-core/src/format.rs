//! Display helpers: date labels, unit conversion and icon links.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// `Tue, Nov 14` for a unix timestamp, in the host's local timezone.
pub fn short_date_label(timestamp: i64) -> Option<String> {
    short_date_label_in(timestamp, &Local)
}

pub fn short_date_label_in<Tz>(timestamp: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.with_timezone(tz).format("%a, %b %-d").to_string())
}

/// `Thursday, October 15, 2026` for the current wall-clock time.
pub fn long_date_label() -> String {
    long_date_label_at(&Local::now())
}

pub fn long_date_label_at<Tz>(when: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    when.format("%A, %B %-d, %Y").to_string()
}

/// Round half up, so `-2.5` becomes `-2` and `2.5` becomes `3`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn wind_kmh(speed_mps: f64) -> i64 {
    round_half_up(speed_mps * 3.6)
}

pub fn visibility_km(visibility_m: u32) -> i64 {
    round_half_up(f64::from(visibility_m) / 1000.0)
}

/// Icon image for a provider icon code; `large` selects the 4x variant used
/// for current conditions.
pub fn icon_url(icon: &str, large: bool) -> String {
    if large {
        format!("{ICON_BASE_URL}/{icon}@4x.png")
    } else {
        format!("{ICON_BASE_URL}/{icon}.png")
    }
}
