use crate::app::prompts;
use crate::core::extractor;
use crate::domain::model::{DiseaseRequest, DiseaseResponse, LabelParts};
use crate::domain::ports::{ImageClassifier, TextGenerator};
use std::sync::Arc;

pub fn fallback_diagnosis(plant_name: &str) -> DiseaseResponse {
    DiseaseResponse {
        plant_name: plant_name.to_string(),
        possible_diseases: vec!["Could not determine based on provided information".to_string()],
        recommendations: vec!["Consult a local agricultural extension service".to_string()],
        preventive_measures: vec!["Regular inspection of plants".to_string()],
        organic_solutions: Some(vec!["Natural pest deterrents".to_string()]),
        chemical_solutions: Some(vec![
            "Use appropriate fungicides or pesticides as advised by experts".to_string(),
        ]),
    }
}

pub fn image_fallback() -> DiseaseResponse {
    DiseaseResponse {
        plant_name: "Unknown".to_string(),
        possible_diseases: vec!["Could not determine from image".to_string()],
        recommendations: vec![
            "Upload a clearer image".to_string(),
            "Try describing the symptoms manually".to_string(),
        ],
        preventive_measures: vec!["Regular inspection of plants".to_string()],
        organic_solutions: Some(vec!["Natural pest deterrents".to_string()]),
        chemical_solutions: Some(vec![
            "Use appropriate fungicides or pesticides as advised by experts".to_string(),
        ]),
    }
}

pub struct DiseaseAgent {
    generator: Arc<dyn TextGenerator>,
    classifier: Arc<dyn ImageClassifier>,
}

impl DiseaseAgent {
    pub fn new(generator: Arc<dyn TextGenerator>, classifier: Arc<dyn ImageClassifier>) -> Self {
        Self {
            generator,
            classifier,
        }
    }

    /// 依症狀描述診斷
    pub async fn diagnose(&self, request: &DiseaseRequest) -> DiseaseResponse {
        let prompt = prompts::disease_prompt(request);

        match self
            .generator
            .generate(&prompt, Some(prompts::DISEASE_SYSTEM_INSTRUCTION))
            .await
        {
            Ok(reply) => {
                extractor::extract_or(&reply, || fallback_diagnosis(&request.plant_name))
            }
            Err(e) => {
                tracing::warn!("⚠️ Diagnosis for {} failed: {}", request.plant_name, e);
                fallback_diagnosis(&request.plant_name)
            }
        }
    }

    /// 影像 → 分類標籤 → 拆出植物與病名 → 交給文字診斷
    pub async fn diagnose_from_image(&self, image: &[u8]) -> DiseaseResponse {
        let label = match self.classifier.classify(image).await {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!("⚠️ Image classification failed: {}", e);
                return image_fallback();
            }
        };
        tracing::info!("🔍 Classifier label: {}", label);

        let reply = match self
            .generator
            .generate(
                &prompts::label_prompt(&label),
                Some(prompts::LABEL_SYSTEM_INSTRUCTION),
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("⚠️ Label extraction failed: {}", e);
                return image_fallback();
            }
        };

        let request = match extractor::extract_record::<LabelParts>(&reply) {
            Ok(parts) => DiseaseRequest {
                plant_name: parts.plant_name.unwrap_or_else(|| "Unknown".to_string()),
                disease_description: format!(
                    "The plant appears to have {}",
                    parts
                        .disease_name
                        .unwrap_or_else(|| "an unknown disease".to_string())
                ),
                additional_info: Some(format!(
                    "Detected via automated image analysis. Original label: {}",
                    label
                )),
            },
            Err(e) => {
                tracing::warn!("⚠️ Could not split label '{}': {}", label, e);
                DiseaseRequest {
                    plant_name: "Unknown".to_string(),
                    disease_description: format!(
                        "The plant appears to have a disease. Model prediction: {}",
                        label
                    ),
                    additional_info: Some(
                        "Failed to parse model prediction into plant and disease names."
                            .to_string(),
                    ),
                }
            }
        };

        self.diagnose(&request).await
    }
}
