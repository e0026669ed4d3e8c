use httpmock::prelude::*;
use plant_care::{AppConfig, PlantCareAssistant};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

/// 從 TOML 檔載入，所有供應商都指向 mock server
fn load_config(server: &MockServer, chunk_size: usize) -> AppConfig {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[gemini]
api_key = "gemini-key"
model = "gemini-1.5-flash"
base_url = "{base}"
rate_limit = 120

[weather]
api_key = "weather-key"
base_url = "{base}"

[classifier]
endpoint = "{base}/classify"

[translation]
chunk_size = {chunk_size}
"#,
        base = server.base_url(),
        chunk_size = chunk_size
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    config.validate_config().unwrap();
    config
}

#[tokio::test]
async fn test_ui_labels_are_translated_once() {
    let server = MockServer::start();
    let ui_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GEMINI_PATH)
            .body_contains("Only translate the values, not the keys.");
        then.status(200).json_body(gemini_reply(
            "```json\n{\"Plant\": \"উদ্ভিদ\", \"Location\": \"অবস্থান\"}\n```",
        ));
    });

    let assistant = PlantCareAssistant::from_config(&load_config(&server, 500)).unwrap();
    let (first, second, third) = tokio::join!(
        assistant.ui_labels(),
        assistant.ui_labels(),
        assistant.ui_labels()
    );

    ui_mock.assert_hits(1);
    assert_eq!(first.bangla["Plant"], "উদ্ভিদ");
    assert_eq!(second.bangla["Location"], "অবস্থান");
    assert_eq!(third.bangla["Winter"], "Winter");
    assert_eq!(first.english.len(), first.bangla.len());

    assistant.ui_labels().await;
    ui_mock.assert_hits(1);
}

#[tokio::test]
async fn test_ui_labels_outage_serves_english() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GEMINI_PATH);
        then.status(500)
            .json_body(json!({"error": {"code": 500, "message": "internal"}}));
    });

    let assistant = PlantCareAssistant::from_config(&load_config(&server, 500)).unwrap();
    let labels = assistant.ui_labels().await;

    assert_eq!(labels.bangla, labels.english);
    assert_eq!(labels.english["Get Diagnosis"], "Get Diagnosis");
}

#[tokio::test]
async fn test_arbitrary_json_keeps_shape() {
    let server = MockServer::start();
    let translate_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GEMINI_PATH)
            .body_contains("Translate the following English text to Bangla");
        then.status(200).json_body(gemini_reply("বাংলা"));
    });

    let assistant = PlantCareAssistant::from_config(&load_config(&server, 500)).unwrap();
    let output = assistant
        .translate(json!({
            "title": "Watering schedule",
            "steps": ["Water early", "Check soil", "ok"],
            "litres": 2.5,
            "year": "2024",
            "done": false
        }))
        .await;

    // "ok" 太短、"2024" 是數字，都不送出
    translate_mock.assert_hits(3);
    assert_eq!(
        output,
        json!({
            "title": "বাংলা",
            "steps": ["বাংলা", "বাংলা", "ok"],
            "litres": 2.5,
            "year": "2024",
            "done": false
        })
    );
}

#[tokio::test]
async fn test_long_text_is_sent_in_chunks() {
    let server = MockServer::start();
    let translate_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GEMINI_PATH)
            .body_contains("Translate the following English text to Bangla");
        then.status(200).json_body(gemini_reply("খণ্ড"));
    });

    let assistant = PlantCareAssistant::from_config(&load_config(&server, 40)).unwrap();
    let text = "Leaves curl upward when the plant is thirsty. ".repeat(2);
    assert_eq!(text.chars().count(), 92);

    let output = assistant.translate_text(&text).await;

    translate_mock.assert_hits(3);
    assert_eq!(output, "খণ্ডখণ্ডখণ্ড");
}

#[tokio::test]
async fn test_translation_failure_returns_original() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GEMINI_PATH);
        then.status(429)
            .json_body(json!({"error": {"code": 429, "message": "quota"}}));
    });

    let assistant = PlantCareAssistant::from_config(&load_config(&server, 500)).unwrap();
    let output = assistant.translate_text("Powdery mildew").await;

    assert_eq!(output, "Powdery mildew");
}
