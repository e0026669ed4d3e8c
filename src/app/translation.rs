//! 英文 → 孟加拉文翻譯：單一字串的 LLM 翻譯函式、結構化走訪，以及介面文字的快取表。

use crate::app::prompts;
use crate::core::extractor;
use crate::core::translator::StructuredTranslator;
use crate::domain::model::UiTranslations;
use crate::domain::ports::{StringTranslator, TextGenerator};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// 介面上固定出現的文字，整批翻譯一次後快取
pub const UI_LABELS: [&str; 53] = [
    "Plant Care Assistant",
    "Welcome to Plant Care Assistant!",
    "Get expert advice on plant diseases, seasonal planting plans, and weather forecasts for your garden.",
    "Plant Disease Diagnosis",
    "Text Description",
    "Image Upload",
    "Plant Name",
    "Symptoms Description",
    "Additional Information (optional)",
    "Get Diagnosis",
    "Upload Plant Image",
    "Analyze Image",
    "Diagnosis Results",
    "Seasonal Planting Plan",
    "Location",
    "Season (optional)",
    "Current Season",
    "Spring",
    "Summer",
    "Fall",
    "Winter",
    "Garden Size (optional)",
    "Not specified",
    "Small",
    "Medium",
    "Large",
    "Plant Types (optional)",
    "Get Planting Plan",
    "Planting Plan",
    "Weather Forecast for Agriculture",
    "Days to Forecast",
    "Get Weather Forecast",
    "Weather Forecast",
    "Processing your request...",
    "Plant",
    "Possible Diseases",
    "Recommendations",
    "Preventive Measures",
    "Organic Solutions",
    "Chemical Solutions",
    "Planting Time",
    "Growing Conditions",
    "Care Instructions",
    "General Advice",
    "Date",
    "Temp High",
    "Temp Low",
    "Precipitation",
    "Description",
    "Planting Advice",
    "Recommended Plants",
    "No specific plant recommendations available.",
    "No forecast data available.",
];

/// 短字串與純數字不值得送出翻譯
fn skip_translation(text: &str) -> bool {
    if text.chars().count() < 3 {
        return true;
    }
    let digits: String = text.chars().filter(|c| *c != '.').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// 以 LLM 翻譯單一字串；失敗時回傳原文
pub struct GeminiTranslator {
    generator: Arc<dyn TextGenerator>,
}

impl GeminiTranslator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl StringTranslator for GeminiTranslator {
    async fn translate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        if skip_translation(text) {
            return text.to_string();
        }

        match self
            .generator
            .generate(
                &prompts::translation_prompt(text),
                Some(prompts::TRANSLATION_SYSTEM_INSTRUCTION),
            )
            .await
        {
            Ok(reply) => reply.replace("```", "").trim().to_string(),
            Err(e) => {
                tracing::warn!("⚠️ Translation failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }
}

fn english_labels() -> Map<String, Value> {
    UI_LABELS
        .iter()
        .map(|label| (label.to_string(), Value::String(label.to_string())))
        .collect()
}

pub struct TranslationService {
    generator: Arc<dyn TextGenerator>,
    structured: StructuredTranslator,
    ui_cache: OnceCell<UiTranslations>,
}

impl TranslationService {
    pub fn new(generator: Arc<dyn TextGenerator>, chunk_size: usize) -> Self {
        let translator = Arc::new(GeminiTranslator::new(generator.clone()));
        Self {
            generator,
            structured: StructuredTranslator::with_chunk_size(translator, chunk_size),
            ui_cache: OnceCell::new(),
        }
    }

    pub async fn translate_text(&self, text: &str) -> String {
        self.structured.translate_text(text).await
    }

    pub async fn translate_value(&self, value: Value) -> Value {
        self.structured.translate(value).await
    }

    pub async fn translate_record<T>(&self, record: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.structured.translate_record(record).await
    }

    /// 介面文字表。只有第一個呼叫者會送出整批翻譯，同時抵達的呼叫者等待同一份結果。
    pub async fn ui_translations(&self) -> &UiTranslations {
        self.ui_cache
            .get_or_init(|| self.fill_ui_translations())
            .await
    }

    async fn fill_ui_translations(&self) -> UiTranslations {
        let english = english_labels();
        let labels_json = Value::Object(english.clone()).to_string();
        tracing::info!("🌐 Translating {} UI labels", english.len());

        let bangla = match self
            .generator
            .generate(
                &prompts::ui_translation_prompt(&labels_json),
                Some(prompts::UI_TRANSLATION_SYSTEM_INSTRUCTION),
            )
            .await
        {
            Ok(reply) => match extractor::extract_record::<Map<String, Value>>(&reply) {
                Ok(translated) => english
                    .iter()
                    .map(|(key, original)| {
                        let value = translated
                            .get(key)
                            .filter(|v| v.is_string())
                            .unwrap_or(original);
                        (key.clone(), value.clone())
                    })
                    .collect(),
                Err(e) => {
                    tracing::warn!("⚠️ UI translation unusable, serving English labels: {}", e);
                    english.clone()
                }
            },
            Err(e) => {
                tracing::warn!("⚠️ UI translation failed, serving English labels: {}", e);
                english.clone()
            }
        };

        UiTranslations { english, bangla }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::agents::fakes::ScriptedGenerator;
    use crate::utils::error::PlantCareError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_skip_translation() {
        assert!(skip_translation("ok"));
        assert!(skip_translation("2024"));
        assert!(skip_translation("3.14"));
        assert!(!skip_translation("..."));
        assert!(!skip_translation("Rust"));
        assert!(!skip_translation("25°C"));
    }

    #[tokio::test]
    async fn test_translator_short_circuits() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let translator = GeminiTranslator::new(generator.clone());

        assert_eq!(translator.translate("").await, "");
        assert_eq!(translator.translate("Hi").await, "Hi");
        assert_eq!(translator.translate("12.5").await, "12.5");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translator_strips_fences() {
        let generator = Arc::new(ScriptedGenerator::replying("```\nটমেটো\n```"));
        let translator = GeminiTranslator::new(generator.clone());

        assert_eq!(translator.translate("Tomato").await, "টমেটো");
        assert!(generator.prompt(0).contains("```\nTomato\n```"));
    }

    #[tokio::test]
    async fn test_translator_failure_returns_original() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(PlantCareError::provider(
            "gemini", "quota",
        ))]));
        let translator = GeminiTranslator::new(generator);

        assert_eq!(translator.translate("Early blight").await, "Early blight");
    }

    #[tokio::test]
    async fn test_ui_translations_fill_missing_keys_with_english() {
        let generator = Arc::new(ScriptedGenerator::replying(
            "```json\n{\"Plant\": \"উদ্ভিদ\", \"Date\": 7}\n```",
        ));
        let service = TranslationService::new(generator, 500);

        let labels = service.ui_translations().await;

        assert_eq!(labels.english.len(), UI_LABELS.len());
        assert_eq!(labels.bangla.len(), UI_LABELS.len());
        assert_eq!(labels.bangla["Plant"], "উদ্ভিদ");
        assert_eq!(labels.bangla["Date"], "Date");
        assert_eq!(labels.bangla["Winter"], "Winter");
    }

    #[tokio::test]
    async fn test_ui_translations_malformed_reply_serves_english() {
        let generator = Arc::new(ScriptedGenerator::replying("Sorry, I cannot do that."));
        let service = TranslationService::new(generator, 500);

        let labels = service.ui_translations().await;

        assert_eq!(labels.bangla, labels.english);
    }

    struct SlowCountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for SlowCountingGenerator {
        async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(r#"{"Plant": "উদ্ভিদ"}"#.to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ui_translations_single_flight() {
        let generator = Arc::new(SlowCountingGenerator {
            calls: AtomicUsize::new(0),
        });
        let service = TranslationService::new(generator.clone(), 500);

        let results =
            futures_util::future::join_all((0..5).map(|_| service.ui_translations())).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|labels| labels.bangla["Plant"] == "উদ্ভিদ"));

        service.ui_translations().await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_translate_value_keeps_structure() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok("পাতা".to_string())]));
        let service = TranslationService::new(generator, 500);

        let translated = service
            .translate_value(serde_json::json!({"leaf": "Leaf spot", "count": 3, "ok": true}))
            .await;

        assert_eq!(
            translated,
            serde_json::json!({"leaf": "পাতা", "count": 3, "ok": true})
        );
    }
}
