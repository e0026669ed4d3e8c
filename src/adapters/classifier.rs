use crate::config::toml_config::ClassifierConfig;
use crate::core::ImageClassifier;
use crate::utils::error::{PlantCareError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "classifier";

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f64,
}

/// 依檔頭判斷影像格式，回傳對應的 MIME type
pub fn detect_image_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// 透過託管推論端點執行預訓練的植物病害分類模型
pub struct HttpImageClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpImageClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token(),
        })
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image: &[u8]) -> Result<String> {
        let content_type = detect_image_format(image).ok_or_else(|| PlantCareError::InvalidInput {
            message: "unsupported image encoding".to_string(),
        })?;

        tracing::debug!(
            "📡 Classifying {} image ({} bytes)",
            content_type,
            image.len()
        );
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image.to_vec());
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            let raw = response.text().await.unwrap_or_default();
            return Err(PlantCareError::InvalidInput {
                message: format!("classifier rejected image: {}", raw),
            });
        }
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(PlantCareError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status.as_u16(), raw),
            ));
        }

        let predictions: Vec<Prediction> = response.json().await?;
        predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| best.label)
            .ok_or_else(|| PlantCareError::provider(PROVIDER, "no predictions returned"))
    }
}
