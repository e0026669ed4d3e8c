use crate::domain::model::WeatherForecast;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

const PRECIPITATION_CONDITIONS: [&str; 3] = ["Rain", "Snow", "Drizzle"];

/// OpenWeatherMap `/forecast` 回應中用得到的部分（3 小時一筆）
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<City>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    /// 與 UTC 的秒數差
    #[serde(default)]
    pub timezone: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: Readings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub rain: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Readings {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

impl ForecastEntry {
    fn has_precipitation(&self) -> bool {
        self.rain.is_some()
            || self
                .weather
                .iter()
                .any(|w| PRECIPITATION_CONDITIONS.contains(&w.main.as_str()))
    }
}

fn parse_payload(raw: &Value) -> Option<ForecastPayload> {
    match serde_json::from_value(raw.clone()) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::debug!("Weather payload not usable: {}", e);
            None
        }
    }
}

/// 給 LLM 提示用的天氣摘要。
///
/// 降水計數以供應商的每一筆資料為單位（3 小時一筆），而不是日曆天。
pub fn summarize_weather(raw: &Value) -> String {
    let Some(payload) = parse_payload(raw) else {
        return "Weather data unavailable".to_string();
    };

    let entries = &payload.list;
    if entries.is_empty() {
        return "No forecast data available".to_string();
    }

    let count = entries.len();
    let avg_temp = entries.iter().map(|e| e.main.temp).sum::<f64>() / count as f64;
    let max_temp = entries
        .iter()
        .map(|e| e.main.temp_max)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_temp = entries
        .iter()
        .map(|e| e.main.temp_min)
        .fold(f64::INFINITY, f64::min);
    let precipitation = entries.iter().filter(|e| e.has_precipitation()).count();

    format!(
        "Average temperature: {:.1}°C (Range: {:.1}°C to {:.1}°C). Precipitation expected on {} out of {} days.",
        avg_temp, min_temp, max_temp, precipitation, count
    )
}

/// 依日期合併成每日預報：取最高溫、最低溫、最大降水機率，描述取當日第一筆
pub fn daily_forecasts(raw: &Value) -> Vec<WeatherForecast> {
    let Some(payload) = parse_payload(raw) else {
        return Vec::new();
    };
    let offset = payload.city.and_then(|c| c.timezone).unwrap_or(0);

    let mut days: Vec<WeatherForecast> = Vec::new();
    for entry in &payload.list {
        let date = match DateTime::from_timestamp(entry.dt + offset, 0) {
            Some(ts) => ts.format("%Y-%m-%d").to_string(),
            None => {
                tracing::warn!("Skipping forecast entry with invalid timestamp {}", entry.dt);
                continue;
            }
        };
        let pop = entry.pop.unwrap_or(0.0);

        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.temperature_high = day.temperature_high.max(entry.main.temp_max);
                day.temperature_low = day.temperature_low.min(entry.main.temp_min);
                day.precipitation_chance = day.precipitation_chance.max(pop);
            }
            None => days.push(WeatherForecast {
                date,
                temperature_high: entry.main.temp_max,
                temperature_low: entry.main.temp_min,
                precipitation_chance: pop,
                description: entry
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_else(|| "No data".to_string()),
            }),
        }
    }

    days
}
