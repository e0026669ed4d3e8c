use crate::config::toml_config::GeminiConfig;
use crate::core::{RateLimiter, TextGenerator};
use crate::utils::error::{PlantCareError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const PROVIDER: &str = "gemini";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Gemini `generateContent` REST 客戶端，所有呼叫先經過共用的限流器
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    generation: GenerationConfig,
    limiter: Arc<RateLimiter>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::per_minute(config.rate_limit)?);
        Self::with_limiter(config, limiter)
    }

    fn with_limiter(config: &GeminiConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key()?,
            model: config.model.clone(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
            },
            limiter,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, system_instruction: Option<&str>) -> Result<String> {
        self.limiter.acquire().await;

        // 系統指示直接放在提示前面，中間空一行
        let text = match system_instruction {
            Some(instruction) => format!("{}\n\n{}", instruction, prompt),
            None => prompt.to_string(),
        };
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &text }],
            }],
            generation_config: &self.generation,
        };

        tracing::debug!("📡 Calling Gemini model {} ({} chars)", self.model, text.len());
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|body| body.error.message)
                .unwrap_or(raw);
            return Err(PlantCareError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status.as_u16(), message),
            ));
        }

        let payload: GenerateResponse = response.json().await?;
        let reply: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if reply.is_empty() {
            let reason = payload
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "empty response".to_string());
            return Err(PlantCareError::provider(
                PROVIDER,
                format!("no text returned: {}", reason),
            ));
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base_url: String) -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            rate_limit: 60,
            ..GeminiConfig::default()
        }
    }

    fn model_path() -> String {
        format!("/v1beta/models/{}:generateContent", GeminiConfig::default().model)
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(model_path())
                .query_param("key", "test-key")
                .body_contains("You are a plant disease expert")
                .body_contains("\"maxOutputTokens\":1024");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "garden"}]},
                        "finishReason": "STOP"
                    }]
                }));
        });

        let client = GeminiClient::new(&test_config(server.base_url())).unwrap();
        let text = client
            .generate("What is wrong?", Some("You are a plant disease expert"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, "Hello garden");
    }

    #[tokio::test]
    async fn test_http_error_becomes_provider_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(model_path());
            then.status(429).json_body(json!({
                "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
            }));
        });

        let client = GeminiClient::new(&test_config(server.base_url())).unwrap();
        let result = client.generate("prompt", None).await;

        api_mock.assert();
        match result {
            Err(PlantCareError::ProviderError { provider, message }) => {
                assert_eq!(provider, "gemini");
                assert!(message.contains("429"));
                assert!(message.contains("Resource has been exhausted"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(model_path());
            then.status(200)
                .json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        });

        let client = GeminiClient::new(&test_config(server.base_url())).unwrap();
        let err = client.generate("prompt", None).await.unwrap_err();

        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_back_to_back_calls_wait_for_limiter() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(model_path());
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            }));
        });

        // 1 次 / 300ms，第二次呼叫必須等到第一次放行滿一個 window
        let window = Duration::from_millis(300);
        let limiter = Arc::new(RateLimiter::new(1, window).unwrap());
        let client = GeminiClient::with_limiter(&test_config(server.base_url()), limiter).unwrap();
        let start = std::time::Instant::now();

        client.generate("first", None).await.unwrap();
        client.generate("second", None).await.unwrap();

        api_mock.assert_hits(2);
        assert!(start.elapsed() >= window);
    }

    #[test]
    fn test_missing_api_key() {
        let config = GeminiConfig {
            api_key: None,
            ..GeminiConfig::default()
        };
        assert!(matches!(
            GeminiClient::new(&config),
            Err(PlantCareError::MissingConfigError { .. })
        ));
    }
}
