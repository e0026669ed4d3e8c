use crate::utils::error::{PlantCareError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_CLASSIFIER_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/linkanjarad/mobilenet_v2_1.0_224-plant-disease-identification";

/// 讀取環境變數並解析，失敗時用預設值
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_gemini_api_key() -> Option<String> {
    env_opt("GEMINI_API_KEY")
}

fn default_gemini_model() -> String {
    env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL.to_string())
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_gemini_rate_limit() -> u32 {
    env_or("GEMINI_RATE_LIMIT", 60)
}

fn default_weather_api_key() -> Option<String> {
    env_opt("WEATHER_API_KEY")
}

fn default_weather_base_url() -> String {
    DEFAULT_WEATHER_BASE_URL.to_string()
}

fn default_weather_rate_limit() -> u32 {
    env_or("WEATHER_RATE_LIMIT", 60)
}

fn default_classifier_endpoint() -> String {
    DEFAULT_CLASSIFIER_ENDPOINT.to_string()
}

fn default_classifier_token() -> Option<String> {
    env_opt("CLASSIFIER_API_TOKEN")
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_chunk_size() -> usize {
    crate::core::translator::DEFAULT_CHUNK_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_api_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// 每分鐘請求數
    #[serde(default = "default_gemini_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_api_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// 每分鐘請求數
    #[serde(default = "default_weather_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_classifier_token")]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: default_gemini_api_key(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            rate_limit: default_gemini_rate_limit(),
            timeout_seconds: default_timeout_seconds(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_weather_api_key(),
            base_url: default_weather_base_url(),
            rate_limit: default_weather_rate_limit(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            api_token: default_classifier_token(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// 未替換的 `${VAR}` 或空白視為未設定
fn resolved(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !(v.starts_with("${") && v.ends_with('}')))
        .map(str::to_string)
}

impl GeminiConfig {
    pub fn api_key(&self) -> Result<String> {
        validation::validate_required_field("gemini.api_key", &resolved(&self.api_key)).cloned()
    }
}

impl WeatherConfig {
    pub fn api_key(&self) -> Result<String> {
        validation::validate_required_field("weather.api_key", &resolved(&self.api_key)).cloned()
    }
}

impl ClassifierConfig {
    pub fn api_token(&self) -> Option<String> {
        resolved(&self.api_token)
    }
}

impl AppConfig {
    /// 只用環境變數與預設值
    pub fn from_env() -> Self {
        Self::default()
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlantCareError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlantCareError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlantCareError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("gemini.model", &self.gemini.model)?;
        validation::validate_url("gemini.base_url", &self.gemini.base_url)?;
        validation::validate_positive_number(
            "gemini.rate_limit",
            self.gemini.rate_limit as usize,
            1,
        )?;
        validation::validate_range("gemini.temperature", self.gemini.temperature, 0.0, 2.0)?;
        validation::validate_range("gemini.top_p", self.gemini.top_p, 0.0, 1.0)?;
        validation::validate_positive_number(
            "gemini.max_output_tokens",
            self.gemini.max_output_tokens as usize,
            1,
        )?;

        validation::validate_url("weather.base_url", &self.weather.base_url)?;
        validation::validate_positive_number(
            "weather.rate_limit",
            self.weather.rate_limit as usize,
            1,
        )?;

        validation::validate_url("classifier.endpoint", &self.classifier.endpoint)?;

        validation::validate_positive_number(
            "translation.chunk_size",
            self.translation.chunk_size,
            1,
        )?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
