#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{AppConfig, LogFormat};

#[cfg(feature = "cli")]
use crate::domain::model::Language;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "plant-care")]
#[command(about = "Plant care assistant: disease diagnosis, planting plans and weather advice")]
pub struct CliConfig {
    /// Path to TOML configuration file (environment variables are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Response language
    #[arg(long, value_enum, global = true, default_value = "en")]
    pub lang: Language,

    #[command(subcommand)]
    pub command: cli::Command,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔，未指定時改用環境變數
    pub fn load_app_config(&self) -> crate::Result<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::from_file(path),
            None => Ok(AppConfig::from_env()),
        }
    }

    pub fn log_format(&self, config: &AppConfig) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            config.logging.format
        }
    }
}
