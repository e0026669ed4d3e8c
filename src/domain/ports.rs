use crate::utils::error::Result;
use async_trait::async_trait;

/// LLM 文字生成
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, system_instruction: Option<&str>) -> Result<String>;
}

/// 天氣預報來源，回傳供應商原始 JSON
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn get_forecast(&self, location: &str, days: u32) -> Result<serde_json::Value>;
}

/// 影像分類：圖片位元組 → 單一標籤
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<String>;
}

/// 單一字串翻譯。實作必須自行吞下失敗並回傳某個字串（通常是原文）。
#[async_trait]
pub trait StringTranslator: Send + Sync {
    async fn translate(&self, text: &str) -> String;
}
