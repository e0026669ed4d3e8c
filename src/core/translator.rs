use crate::domain::ports::StringTranslator;
use crate::utils::error::Result;
use futures_util::future::{join_all, BoxFuture, FutureExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// 遞迴走訪 JSON 值，翻譯每個字串葉節點並保留原本結構。
///
/// 同一層的所有子節點同時送出翻譯，結果依索引/鍵組回，與完成順序無關。
/// 物件的鍵不翻譯；數字、布林與 null 原樣傳回。
/// 超過 `chunk_size` 個字元的字串會切塊分別翻譯再依序串接，
/// 切點可能落在句子中間，語意不保證連貫。
pub struct StructuredTranslator {
    translator: Arc<dyn StringTranslator>,
    chunk_size: usize,
}

impl StructuredTranslator {
    pub fn new(translator: Arc<dyn StringTranslator>) -> Self {
        Self::with_chunk_size(translator, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(translator: Arc<dyn StringTranslator>, chunk_size: usize) -> Self {
        Self {
            translator,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn translate(&self, value: Value) -> Value {
        self.translate_value(value).await
    }

    /// 經由 JSON 值翻譯具型別紀錄；結構不變，只有違反契約時才會失敗
    pub async fn translate_record<T>(&self, record: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let value = serde_json::to_value(record)?;
        let translated = self.translate_value(value).await;
        Ok(serde_json::from_value(translated)?)
    }

    pub async fn translate_text(&self, text: &str) -> String {
        if text.chars().count() <= self.chunk_size {
            return self.translator.translate(text).await;
        }

        let chunks = split_chunks(text, self.chunk_size);
        tracing::debug!(
            "Splitting {} characters into {} chunks for translation",
            text.chars().count(),
            chunks.len()
        );
        let translated = join_all(chunks.iter().map(|chunk| self.translator.translate(chunk))).await;
        translated.concat()
    }

    fn translate_value(&self, value: Value) -> BoxFuture<'_, Value> {
        async move {
            match value {
                Value::String(text) => Value::String(self.translate_text(&text).await),
                Value::Array(items) => {
                    let translated =
                        join_all(items.into_iter().map(|item| self.translate_value(item))).await;
                    Value::Array(translated)
                }
                Value::Object(map) => {
                    let (keys, values): (Vec<String>, Vec<Value>) = map.into_iter().unzip();
                    let translated =
                        join_all(values.into_iter().map(|item| self.translate_value(item))).await;
                    Value::Object(keys.into_iter().zip(translated).collect())
                }
                other @ (Value::Null | Value::Bool(_) | Value::Number(_)) => other,
            }
        }
        .boxed()
    }
}

/// 依字元（非位元組）切成固定大小的連續區塊，最後一塊可能較短
fn split_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
