pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::Command, CliConfig};

pub use app::PlantCareAssistant;
pub use config::{AppConfig, LogFormat};
pub use utils::error::{PlantCareError, Result};
