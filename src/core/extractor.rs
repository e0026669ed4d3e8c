//! 從模型的自由文字回覆中取出 JSON。
//!
//! 呼叫端只會看到解析結果或 `MalformedResponse`，圍欄判斷的細節不外洩。

use crate::utils::error::{MalformedKind, PlantCareError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

const TAGGED_FENCE: &str = "```json";
const FENCE: &str = "```";

/// 區塊第一行若只有語言標籤（```javascript、```JSON 等），略過該行
fn strip_language_tag(block: &str) -> &str {
    match block.split_once('\n') {
        Some((tag, body))
            if !tag.trim().is_empty()
                && tag
                    .trim()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')) =>
        {
            body
        }
        _ => block,
    }
}

/// 取出候選 JSON 文字：優先 ```json 區塊（不分大小寫），其次第一個區塊，否則整段文字
fn candidate(raw: &str) -> &str {
    // ASCII 轉小寫不改變位元組位置
    let fenced = if let Some(start) = raw.to_ascii_lowercase().find(TAGGED_FENCE) {
        let rest = &raw[start + TAGGED_FENCE.len()..];
        rest.split(FENCE).next().unwrap_or(rest)
    } else if raw.contains(FENCE) {
        strip_language_tag(raw.split(FENCE).nth(1).unwrap_or(raw))
    } else {
        raw
    };
    fenced.trim()
}

pub fn extract_json(raw: &str) -> Result<Value> {
    serde_json::from_str(candidate(raw)).map_err(|e| {
        tracing::debug!("Failed to parse model output as JSON: {}", e);
        PlantCareError::parse_error(raw)
    })
}

/// 解析並轉成具型別紀錄，結構不符時回傳 `ShapeMismatch`
pub fn extract_record<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value = extract_json(raw)?;
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Model JSON does not match expected shape: {}", e);
        PlantCareError::MalformedResponse {
            kind: MalformedKind::ShapeMismatch,
            raw: raw.to_string(),
        }
    })
}

/// 解析失敗時改用呼叫端提供的備援值
pub fn extract_or<T: DeserializeOwned>(raw: &str, fallback: impl FnOnce() -> T) -> T {
    match extract_record(raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("⚠️ {}, using fallback response", e);
            if let PlantCareError::MalformedResponse { raw, .. } = &e {
                tracing::debug!("Raw model output: {}", raw);
            }
            fallback()
        }
    }
}
