use crate::domain::model::{DiseaseRequest, PlantingPlanRequest};

pub const DISEASE_SYSTEM_INSTRUCTION: &str = r#"You are a plant disease expert AI. Provide your diagnosis in JSON format with the following structure:
{
  "plant_name": "Name of the plant",
  "possible_diseases": ["Disease 1", "Disease 2"],
  "recommendations": ["Recommendation 1", "Recommendation 2"],
  "preventive_measures": ["Measure 1", "Measure 2"],
  "organic_solutions": ["Solution 1", "Solution 2"],
  "chemical_solutions": ["Solution 1", "Solution 2"]
}"#;

pub const LABEL_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant specialized in plant pathology. \
Extract the plant name and disease name from the given label. Return only a valid JSON object with the requested fields.";

pub const PLANTING_SYSTEM_INSTRUCTION: &str = r#"You are an expert gardener and agricultural advisor AI. Provide a planting plan in JSON format with the following structure:
{
  "location": "The location",
  "season": "The current or specified season",
  "recommendations": [
    {
      "plant_name": "Name of the plant",
      "suitable_time": "When to plant",
      "growing_conditions": "Required conditions",
      "care_instructions": "How to care for the plant"
    }
  ],
  "general_advice": "General gardening advice for this location and season"
}"#;

pub const WEATHER_SYSTEM_INSTRUCTION: &str = "You are an agricultural meteorologist. \
Provide practical advice for gardeners and farmers based on the weather forecast.";

pub const TRANSLATION_SYSTEM_INSTRUCTION: &str = "আপনি একজন পেশাদার অনুবাদক যিনি কৃষি, উদ্ভিদ, রোগ এবং আবহাওয়া সম্পর্কিত পরিভাষায় বিশেষজ্ঞ। \
ইংরেজি থেকে বাংলায় সঠিকভাবে অনুবাদ করুন। শুধুমাত্র অনুবাদ দিন, কোনো ব্যাখ্যা বা অতিরিক্ত নোট নয়। \
পারিভাষিক শব্দের ক্ষেত্রে উপযুক্ত বাংলা পরিভাষা ব্যবহার করুন।";

pub const UI_TRANSLATION_SYSTEM_INSTRUCTION: &str = "আপনি একজন পেশাদার UI অনুবাদক। JSON-এর সমস্ত UI মান বাংলায় অনুবাদ করুন। \
শুধুমাত্র মান অনুবাদ করুন, কী নয়। একটি বৈধ JSON ফেরত দিন।";

pub fn disease_prompt(request: &DiseaseRequest) -> String {
    format!(
        "As a plant disease expert, analyze the following information:

Plant: {}
Symptoms: {}
Additional Information: {}

Provide a detailed analysis including:
1. Possible diseases affecting the plant
2. Recommendations for treatment
3. Preventive measures
4. Organic solutions
5. Chemical solutions (if necessary)

Format your response in a clear, structured manner.",
        request.plant_name,
        request.disease_description,
        request.additional_info.as_deref().unwrap_or("None provided")
    )
}

pub fn label_prompt(label: &str) -> String {
    format!(
        "I have a plant disease prediction from an image classifier: \"{}\"

Extract the plant name and disease name from this label. The format varies, but it is usually
something like \"Plant_Disease\", \"Plant Disease\" or \"Plant with Disease\".

Return your answer as a JSON object with these fields:
1. plant_name: The name of the plant (e.g., \"Tomato\", \"Apple\")
2. disease_name: The name of the disease (e.g., \"Bacterial Spot\", \"Rust\")",
        label
    )
}

pub fn planting_prompt(request: &PlantingPlanRequest, weather_conditions: &str) -> String {
    let plant_types = match &request.plant_types {
        Some(types) if !types.is_empty() => types.join(", "),
        _ => "all suitable plants".to_string(),
    };

    format!(
        "As a gardening and agricultural expert, provide a seasonal planting plan for:

Location: {}
Season: {}
Plant Types of Interest: {}
Garden Size: {}
Current Weather Conditions: {}

Include in your response:
1. Best plants to grow in this season at this location
2. Optimal planting times
3. Growing conditions and requirements for each plant
4. Care instructions
5. General gardening advice for this location and season

Format your response in a clear, structured manner.",
        request.location,
        request.season.as_deref().unwrap_or("current season"),
        plant_types,
        request.garden_size.as_deref().unwrap_or("average garden"),
        weather_conditions
    )
}

pub fn weather_prompt(location: &str, forecast_json: &str) -> String {
    format!(
        "As an agricultural meteorologist, interpret the following weather forecast for:

Location: {}
Forecast Data: {}

Provide:
1. Analysis of the weather conditions
2. How these conditions might impact plant growth and health
3. Recommendations for gardening and agricultural activities
4. Precautions to take given the forecast

Format your response in a clear, structured manner.",
        location, forecast_json
    )
}

pub fn translation_prompt(text: &str) -> String {
    format!(
        "Translate the following English text to Bangla (Bengali).
The text might be related to plants, agriculture, diseases, or weather:

```
{}
```

Provide ONLY the translated Bangla text without any notes or explanations.
Maintain all formatting (lists, paragraphs, etc.).",
        text
    )
}

pub fn ui_translation_prompt(labels_json: &str) -> String {
    format!(
        "Translate all the English UI element values in this JSON to Bangla (Bengali).
Only translate the values, not the keys.

```json
{}
```

Return only the translated JSON with the same structure.",
        labels_json
    )
}
