pub mod extractor;
pub mod forecast;
pub mod rate_limiter;
pub mod translator;

pub use crate::domain::model::*;
pub use crate::domain::ports::{ForecastSource, ImageClassifier, StringTranslator, TextGenerator};
pub use crate::utils::error::Result;
pub use rate_limiter::RateLimiter;
pub use translator::StructuredTranslator;
