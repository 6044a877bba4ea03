use serde::{Deserialize, Serialize};

/// Number of 3-hour slots between two sampled forecast entries (one per day).
pub const FORECAST_STRIDE: usize = 8;

/// One sky/precipitation descriptor as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub description: String,
    /// Provider icon code, e.g. `"01d"`; the trailing letter marks day or night.
    pub icon: String,
}

impl Condition {
    pub fn is_day(&self) -> bool {
        self.icon.contains('d')
    }
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    /// Observation time, unix seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    /// Not every station reports visibility.
    pub visibility_m: Option<u32>,
    /// Never empty; the provider client rejects responses without a condition.
    pub conditions: Vec<Condition>,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }

    pub fn is_day(&self) -> bool {
        self.primary_condition().is_some_and(Condition::is_day)
    }
}

/// One sampled future time slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: Condition,
}

pub type Forecast = Vec<ForecastEntry>;

/// Both halves of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub forecast: Forecast,
}

/// Reduce a 3-hour series to roughly one entry per day: keeps `series[0]`,
/// `series[8]`, `series[16]`, ...
pub fn sample_daily<T>(series: Vec<T>) -> Vec<T> {
    series.into_iter().step_by(FORECAST_STRIDE).collect()
}
