use crate::adapters::{GeminiClient, HttpImageClassifier, OpenWeatherClient};
use crate::app::agents::{DiseaseAgent, PlantingAgent, WeatherAgent};
use crate::app::translation::TranslationService;
use crate::config::AppConfig;
use crate::domain::model::{
    DiseaseRequest, DiseaseResponse, Language, PlantingPlanRequest, PlantingPlanResponse,
    UiTranslations, WeatherForecastRequest, WeatherForecastResponse,
};
use crate::domain::ports::{ForecastSource, ImageClassifier, TextGenerator};
use crate::utils::error::{PlantCareError, Result};
use crate::utils::validation::{validate_required_text, Validate};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

impl Validate for DiseaseRequest {
    fn validate(&self) -> Result<()> {
        validate_required_text("plant_name", &self.plant_name)?;
        validate_required_text("disease_description", &self.disease_description)
    }
}

impl Validate for PlantingPlanRequest {
    fn validate(&self) -> Result<()> {
        validate_required_text("location", &self.location)
    }
}

impl Validate for WeatherForecastRequest {
    fn validate(&self) -> Result<()> {
        validate_required_text("location", &self.location)?;
        if self.days < 1 {
            return Err(PlantCareError::ValidationError {
                field: "days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// 對外的單一入口：驗證請求、交給代理人、依語言翻譯回應
pub struct PlantCareAssistant {
    disease: DiseaseAgent,
    planting: PlantingAgent,
    weather: WeatherAgent,
    translation: TranslationService,
}

impl PlantCareAssistant {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        forecasts: Arc<dyn ForecastSource>,
        classifier: Arc<dyn ImageClassifier>,
        chunk_size: usize,
    ) -> Self {
        Self {
            disease: DiseaseAgent::new(generator.clone(), classifier),
            planting: PlantingAgent::new(generator.clone(), forecasts.clone()),
            weather: WeatherAgent::new(generator.clone(), forecasts),
            translation: TranslationService::new(generator, chunk_size),
        }
    }

    /// 所有代理人與翻譯共用同一個 Gemini 客戶端，因此共用同一個限流器
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let generator = Arc::new(GeminiClient::new(&config.gemini)?);
        let forecasts = Arc::new(OpenWeatherClient::new(&config.weather)?);
        let classifier = Arc::new(HttpImageClassifier::new(&config.classifier)?);

        tracing::info!(
            "🌱 Assistant ready (model: {}, {} requests/min)",
            config.gemini.model,
            config.gemini.rate_limit
        );

        Ok(Self::new(
            generator,
            forecasts,
            classifier,
            config.translation.chunk_size,
        ))
    }

    async fn localize<T>(&self, record: T, language: Language) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        match language {
            Language::English => Ok(record),
            Language::Bangla => self.translation.translate_record(&record).await,
        }
    }

    pub async fn diagnose(
        &self,
        request: &DiseaseRequest,
        language: Language,
    ) -> Result<DiseaseResponse> {
        request.validate()?;
        let response = self.disease.diagnose(request).await;
        tracing::info!("✅ Diagnosis ready for {}", response.plant_name);
        self.localize(response, language).await
    }

    pub async fn diagnose_image(&self, image: &[u8], language: Language) -> Result<DiseaseResponse> {
        if image.is_empty() {
            return Err(PlantCareError::ValidationError {
                field: "image".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let response = self.disease.diagnose_from_image(image).await;
        tracing::info!("✅ Image diagnosis ready for {}", response.plant_name);
        self.localize(response, language).await
    }

    pub async fn plan(
        &self,
        request: &PlantingPlanRequest,
        language: Language,
    ) -> Result<PlantingPlanResponse> {
        request.validate()?;
        let response = self.planting.create_plan(request).await;
        tracing::info!(
            "✅ Planting plan ready for {} ({} recommendations)",
            response.location,
            response.recommendations.len()
        );
        self.localize(response, language).await
    }

    pub async fn forecast(
        &self,
        request: &WeatherForecastRequest,
        language: Language,
    ) -> Result<WeatherForecastResponse> {
        request.validate()?;
        let response = self.weather.get_forecast_with_interpretation(request).await;
        tracing::info!(
            "✅ Forecast ready for {} ({} days)",
            response.location,
            response.forecasts.len()
        );
        self.localize(response, language).await
    }

    /// 任意 JSON 值翻成孟加拉文，結構不變
    pub async fn translate(&self, value: Value) -> Value {
        self.translation.translate_value(value).await
    }

    pub async fn translate_text(&self, text: &str) -> String {
        self.translation.translate_text(text).await
    }

    pub async fn ui_labels(&self) -> &UiTranslations {
        self.translation.ui_translations().await
    }
}
