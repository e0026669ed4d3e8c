use crate::app::prompts;
use crate::core::forecast::daily_forecasts;
use crate::domain::model::{WeatherForecastRequest, WeatherForecastResponse, MAX_FORECAST_DAYS};
use crate::domain::ports::{ForecastSource, TextGenerator};
use crate::utils::error::Result;
use std::sync::Arc;

pub fn unavailable_forecast(location: &str) -> WeatherForecastResponse {
    WeatherForecastResponse {
        location: location.to_string(),
        forecasts: Vec::new(),
        planting_advice: "Weather forecast unavailable. Please try again later.".to_string(),
    }
}

pub struct WeatherAgent {
    generator: Arc<dyn TextGenerator>,
    forecasts: Arc<dyn ForecastSource>,
}

impl WeatherAgent {
    pub fn new(generator: Arc<dyn TextGenerator>, forecasts: Arc<dyn ForecastSource>) -> Self {
        Self {
            generator,
            forecasts,
        }
    }

    /// 取得預報並請 LLM 給出農事建議，任何一步失敗都回傳「暫無預報」
    pub async fn get_forecast_with_interpretation(
        &self,
        request: &WeatherForecastRequest,
    ) -> WeatherForecastResponse {
        match self.interpret(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("⚠️ Forecast for {} failed: {}", request.location, e);
                unavailable_forecast(&request.location)
            }
        }
    }

    async fn interpret(&self, request: &WeatherForecastRequest) -> Result<WeatherForecastResponse> {
        let days = request.days.min(MAX_FORECAST_DAYS);
        let payload = self.forecasts.get_forecast(&request.location, days).await?;
        let forecasts = daily_forecasts(&payload);
        tracing::debug!(
            "🌦️ {} daily forecasts for {}",
            forecasts.len(),
            request.location
        );

        let forecast_json = serde_json::to_string_pretty(&forecasts)?;
        let planting_advice = self
            .generator
            .generate(
                &prompts::weather_prompt(&request.location, &forecast_json),
                Some(prompts::WEATHER_SYSTEM_INSTRUCTION),
            )
            .await?;

        Ok(WeatherForecastResponse {
            location: request.location.clone(),
            forecasts,
            planting_advice,
        })
    }
}
