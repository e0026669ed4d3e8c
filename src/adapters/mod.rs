// Adapters layer: concrete HTTP clients for the external providers behind the domain ports.

pub mod classifier;
pub mod gemini;
pub mod weather;

pub use classifier::HttpImageClassifier;
pub use gemini::GeminiClient;
pub use weather::OpenWeatherClient;
