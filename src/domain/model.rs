use serde::{Deserialize, Serialize};

pub const DEFAULT_FORECAST_DAYS: u32 = 7;

/// 預報供應商免費方案一次最多回傳的筆數
pub const MAX_FORECAST_DAYS: u32 = 7;

/// 回應語言；Bangla 會在回傳前逐字串翻譯
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[cfg_attr(feature = "cli", value(name = "en"))]
    English,
    #[cfg_attr(feature = "cli", value(name = "bn"))]
    Bangla,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRequest {
    pub plant_name: String,
    pub disease_description: String,
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseResponse {
    pub plant_name: String,
    pub possible_diseases: Vec<String>,
    pub recommendations: Vec<String>,
    pub preventive_measures: Vec<String>,
    #[serde(default)]
    pub organic_solutions: Option<Vec<String>>,
    #[serde(default)]
    pub chemical_solutions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantingPlanRequest {
    pub location: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub plant_types: Option<Vec<String>>,
    #[serde(default)]
    pub garden_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingRecommendation {
    pub plant_name: String,
    pub suitable_time: String,
    pub growing_conditions: String,
    pub care_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingPlanResponse {
    pub location: String,
    pub season: String,
    pub recommendations: Vec<PlantingRecommendation>,
    pub general_advice: String,
}

fn default_days() -> u32 {
    DEFAULT_FORECAST_DAYS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherForecastRequest {
    pub location: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub date: String,
    pub temperature_high: f64,
    pub temperature_low: f64,
    pub precipitation_chance: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecastResponse {
    pub location: String,
    pub forecasts: Vec<WeatherForecast>,
    pub planting_advice: String,
}

/// 影像分類標籤拆出的植物與病名
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelParts {
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub disease_name: Option<String>,
}

/// 介面文字的英文原文與孟加拉文翻譯，鍵值相同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiTranslations {
    pub english: serde_json::Map<String, serde_json::Value>,
    pub bangla: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_request_defaults_to_seven_days() {
        let request: WeatherForecastRequest =
            serde_json::from_str(r#"{"location": "Dhaka"}"#).unwrap();
        assert_eq!(request.days, 7);
    }

    #[test]
    fn test_disease_response_optional_solutions() {
        let response: DiseaseResponse = serde_json::from_value(serde_json::json!({
            "plant_name": "Tomato",
            "possible_diseases": ["Early blight"],
            "recommendations": ["Remove infected leaves"],
            "preventive_measures": ["Rotate crops"]
        }))
        .unwrap();
        assert!(response.organic_solutions.is_none());
        assert!(response.chemical_solutions.is_none());
    }

    #[test]
    fn test_language_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Language::Bangla).unwrap(),
            "\"bangla\""
        );
    }
}
