use crate::config::toml_config::WeatherConfig;
use crate::core::{ForecastSource, RateLimiter};
use crate::domain::model::MAX_FORECAST_DAYS;
use crate::utils::error::{PlantCareError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const PROVIDER: &str = "weather";

/// OpenWeatherMap `/forecast` 客戶端
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    limiter: Arc<RateLimiter>,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::per_minute(config.rate_limit)?);
        Self::with_limiter(config, limiter)
    }

    fn with_limiter(config: &WeatherConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key()?,
            limiter,
        })
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherClient {
    async fn get_forecast(&self, location: &str, days: u32) -> Result<serde_json::Value> {
        self.limiter.acquire().await;

        let count = days.min(MAX_FORECAST_DAYS).to_string();
        tracing::debug!("📡 Fetching forecast for {} (cnt={})", location, count);

        let response = self
            .client
            .get(format!("{}/forecast", self.base_url))
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("cnt", count.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Weather API response status: {}", status);

        if !status.is_success() {
            // 錯誤格式: {"cod": "404", "message": "city not found"}
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(raw);
            return Err(PlantCareError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status.as_u16(), message),
            ));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base_url: String) -> WeatherConfig {
        WeatherConfig {
            api_key: Some("weather-key".to_string()),
            base_url,
            rate_limit: 60,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_forecast_request_parameters() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/forecast")
                .query_param("q", "Dhaka")
                .query_param("appid", "weather-key")
                .query_param("units", "metric")
                .query_param("cnt", "7");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"cod": "200", "list": []}));
        });

        let client = OpenWeatherClient::new(&test_config(server.base_url())).unwrap();
        // 超過上限會被截到 7
        let payload = client.get_forecast("Dhaka", 14).await.unwrap();

        api_mock.assert();
        assert_eq!(payload["list"], json!([]));
    }

    #[tokio::test]
    async fn test_back_to_back_calls_wait_for_limiter() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/forecast");
            then.status(200).json_body(json!({"cod": "200", "list": []}));
        });

        let window = Duration::from_millis(300);
        let limiter = Arc::new(RateLimiter::new(1, window).unwrap());
        let client =
            OpenWeatherClient::with_limiter(&test_config(server.base_url()), limiter).unwrap();
        let start = std::time::Instant::now();

        client.get_forecast("Dhaka", 1).await.unwrap();
        client.get_forecast("Dhaka", 1).await.unwrap();

        api_mock.assert_hits(2);
        assert!(start.elapsed() >= window);
    }

    #[tokio::test]
    async fn test_city_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/forecast");
            then.status(404)
                .json_body(json!({"cod": "404", "message": "city not found"}));
        });

        let client = OpenWeatherClient::new(&test_config(server.base_url())).unwrap();
        let err = client.get_forecast("Atlantis", 3).await.unwrap_err();

        assert_eq!(err.to_string(), "weather provider error: HTTP 404: city not found");
    }
}
