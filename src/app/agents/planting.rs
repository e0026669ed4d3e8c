use crate::app::prompts;
use crate::core::extractor;
use crate::core::forecast::summarize_weather;
use crate::domain::model::{PlantingPlanRequest, PlantingPlanResponse, DEFAULT_FORECAST_DAYS};
use crate::domain::ports::{ForecastSource, TextGenerator};
use std::sync::Arc;

const WEATHER_UNAVAILABLE: &str = "Weather data unavailable. Providing general recommendations.";

pub fn fallback_plan(request: &PlantingPlanRequest) -> PlantingPlanResponse {
    PlantingPlanResponse {
        location: request.location.clone(),
        season: request
            .season
            .clone()
            .unwrap_or_else(|| "current season".to_string()),
        recommendations: Vec::new(),
        general_advice:
            "Unable to generate specific recommendations. Please try again with more specific information."
                .to_string(),
    }
}

pub struct PlantingAgent {
    generator: Arc<dyn TextGenerator>,
    forecasts: Arc<dyn ForecastSource>,
}

impl PlantingAgent {
    pub fn new(generator: Arc<dyn TextGenerator>, forecasts: Arc<dyn ForecastSource>) -> Self {
        Self {
            generator,
            forecasts,
        }
    }

    async fn weather_conditions(&self, location: &str) -> String {
        match self
            .forecasts
            .get_forecast(location, DEFAULT_FORECAST_DAYS)
            .await
        {
            Ok(payload) => summarize_weather(&payload),
            Err(e) => {
                tracing::warn!("⚠️ No weather for {}: {}", location, e);
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }

    pub async fn create_plan(&self, request: &PlantingPlanRequest) -> PlantingPlanResponse {
        let conditions = self.weather_conditions(&request.location).await;
        tracing::debug!("🌦️ Conditions for {}: {}", request.location, conditions);

        let prompt = prompts::planting_prompt(request, &conditions);
        match self
            .generator
            .generate(&prompt, Some(prompts::PLANTING_SYSTEM_INSTRUCTION))
            .await
        {
            Ok(reply) => extractor::extract_or(&reply, || fallback_plan(request)),
            Err(e) => {
                tracing::warn!("⚠️ Planting plan for {} failed: {}", request.location, e);
                fallback_plan(request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::agents::fakes::{FixedForecast, ScriptedGenerator};
    use crate::core::forecast::fixtures::two_day_payload;

    fn request() -> PlantingPlanRequest {
        PlantingPlanRequest {
            location: "Dhaka".to_string(),
            season: Some("Winter".to_string()),
            plant_types: Some(vec!["tomato".to_string()]),
            garden_size: None,
        }
    }

    #[tokio::test]
    async fn test_plan_includes_weather_summary() {
        let generator = Arc::new(ScriptedGenerator::replying(
            r#"```json
{
  "location": "Dhaka",
  "season": "Winter",
  "recommendations": [{
    "plant_name": "Tomato",
    "suitable_time": "November",
    "growing_conditions": "Full sun",
    "care_instructions": "Stake and water evenly"
  }],
  "general_advice": "Mulch beds before the dry spell."
}
```"#,
        ));
        let agent = PlantingAgent::new(
            generator.clone(),
            Arc::new(FixedForecast(Some(two_day_payload()))),
        );

        let plan = agent.create_plan(&request()).await;

        assert_eq!(plan.recommendations.len(), 1);
        assert_eq!(plan.recommendations[0].plant_name, "Tomato");
        let prompt = generator.prompt(0);
        assert!(prompt.contains("Current Weather Conditions: Average temperature: 20.7°C"));
        assert!(prompt.contains("Plant Types of Interest: tomato"));
    }

    #[tokio::test]
    async fn test_weather_failure_still_plans() {
        let generator = Arc::new(ScriptedGenerator::replying(
            r#"{"location": "Dhaka", "season": "Winter", "recommendations": [], "general_advice": "Plant leafy greens."}"#,
        ));
        let agent = PlantingAgent::new(generator.clone(), Arc::new(FixedForecast(None)));

        let plan = agent.create_plan(&request()).await;

        assert_eq!(plan.general_advice, "Plant leafy greens.");
        assert!(generator.prompt(0).contains(WEATHER_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_malformed_reply_yields_fallback_plan() {
        let generator = Arc::new(ScriptedGenerator::replying("Plant whatever you like!"));
        let agent = PlantingAgent::new(generator, Arc::new(FixedForecast(None)));

        let plan = agent.create_plan(&request()).await;

        assert_eq!(plan, fallback_plan(&request()));
        assert!(plan.recommendations.is_empty());
        assert_eq!(plan.season, "Winter");
    }

    #[tokio::test]
    async fn test_fallback_plan_defaults_season() {
        let mut request = request();
        request.season = None;
        let agent = PlantingAgent::new(
            Arc::new(ScriptedGenerator::failing()),
            Arc::new(FixedForecast(None)),
        );

        let plan = agent.create_plan(&request).await;

        assert_eq!(plan.location, "Dhaka");
        assert_eq!(plan.season, "current season");
    }
}
