use crate::{
    Config, WeatherError,
    model::{ForecastEntry, WeatherReport, WeatherSnapshot, sample_daily},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`.
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;

    /// The provider's full 3-hour forecast series for `city`, unsampled.
    async fn forecast_series(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Run both lookups for `city` and combine them.
///
/// The requests run concurrently; if either fails the whole lookup fails and
/// the other result is discarded.
pub async fn fetch_report(
    provider: &dyn WeatherProvider,
    city: &str,
) -> Result<WeatherReport, WeatherError> {
    let (snapshot, series) =
        tokio::try_join!(provider.current(city), provider.forecast_series(city))?;

    Ok(WeatherReport {
        snapshot,
        forecast: sample_daily(series),
    })
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(api_key, config.base_url(), config.timeout_secs)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        fail_forecast: bool,
        calls: AtomicUsize,
    }

    fn condition() -> Condition {
        Condition {
            id: 801,
            description: "few clouds".into(),
            icon: "02d".into(),
        }
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WeatherSnapshot {
                location_name: city.to_string(),
                country: "XX".into(),
                timestamp: 0,
                temperature_c: 10.0,
                feels_like_c: 9.0,
                humidity_pct: 50,
                wind_speed_mps: 1.0,
                pressure_hpa: 1000,
                visibility_m: None,
                conditions: vec![condition()],
            })
        }

        async fn forecast_series(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_forecast {
                return Err(WeatherError::CityNotFound(city.to_string()));
            }
            Ok((0..40)
                .map(|i| ForecastEntry {
                    timestamp: i * 3 * 3600,
                    temp_min_c: 0.0,
                    temp_max_c: 1.0,
                    humidity_pct: 60,
                    wind_speed_mps: 2.0,
                    condition: condition(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn report_samples_forecast_series() {
        let provider = CountingProvider::default();
        let report = fetch_report(&provider, "Lima").await.unwrap();

        assert_eq!(report.snapshot.location_name, "Lima");
        assert_eq!(report.forecast.len(), 5);
        assert_eq!(report.forecast[1].timestamp, 8 * 3 * 3600);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn one_failed_half_fails_the_report() {
        let provider = CountingProvider {
            fail_forecast: true,
            ..Default::default()
        };

        let err = fetch_report(&provider, "Lima").await.unwrap_err();
        assert!(matches!(err, WeatherError::CityNotFound(_)));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("no API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
