//! 各代理人：組提示、呼叫限流後的 LLM、解析 JSON，失敗時改用固定的備援紀錄。

pub mod disease;
pub mod planting;
pub mod weather;

pub use disease::DiseaseAgent;
pub use planting::PlantingAgent;
pub use weather::WeatherAgent;
