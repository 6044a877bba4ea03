use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    WeatherError,
    model::{Condition, ForecastEntry, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    /// GET `{base}/{endpoint}?q=..&appid=..&units=metric` and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(endpoint, city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }
        if !status.is_success() {
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    description: String,
    icon: String,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition {
            id: w.id,
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    sys: OwSys,
    main: OwCurrentMain,
    visibility: Option<u32>,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        if parsed.weather.is_empty() {
            return Err(WeatherError::Malformed(
                "current conditions carried no weather descriptor".into(),
            ));
        }

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            country: parsed.sys.country,
            timestamp: parsed.dt,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            visibility_m: parsed.visibility,
            conditions: parsed.weather.into_iter().map(Condition::from).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let condition: Condition = entry
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| {
                WeatherError::Malformed(format!(
                    "forecast slot {} carried no weather descriptor",
                    entry.dt
                ))
            })?
            .into();

        Ok(ForecastEntry {
            timestamp: entry.dt,
            temp_min_c: entry.main.temp_min,
            temp_max_c: entry.main.temp_max,
            humidity_pct: entry.main.humidity,
            wind_speed_mps: entry.wind.speed,
            condition,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;
        parsed.try_into()
    }

    async fn forecast_series(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;
        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_response_maps_to_snapshot() {
        let json = r#"{
            "name": "Paris",
            "dt": 1700000000,
            "sys": { "country": "FR" },
            "main": { "temp": 12.3, "feels_like": 11.1, "humidity": 70, "pressure": 1015 },
            "visibility": 9000,
            "weather": [{ "id": 500, "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 4.2 }
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let snapshot = WeatherSnapshot::try_from(parsed).unwrap();

        assert_eq!(snapshot.location_name, "Paris");
        assert_eq!(snapshot.country, "FR");
        assert_eq!(snapshot.pressure_hpa, 1015);
        assert_eq!(snapshot.visibility_m, Some(9000));
        assert_eq!(snapshot.primary_condition().map(|c| c.id), Some(500));
    }

    #[test]
    fn current_response_without_weather_is_malformed() {
        let json = r#"{
            "name": "Nowhere",
            "dt": 0,
            "main": { "temp": 0, "feels_like": 0, "humidity": 0, "pressure": 0 },
            "weather": [],
            "wind": { "speed": 0 }
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let err = WeatherSnapshot::try_from(parsed).unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(250);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
