use anyhow::Context;
use clap::Parser;
use plant_care::utils::error::PlantCareError;
use plant_care::utils::{logger, validation::Validate};
use plant_care::{CliConfig, Command, LogFormat, PlantCareAssistant};
use serde_json::Value;

fn report(e: &PlantCareError) -> i32 {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    e.exit_code()
}

async fn run(assistant: &PlantCareAssistant, cli: &CliConfig) -> anyhow::Result<Value> {
    let lang = cli.lang;

    let output = match &cli.command {
        Command::Diagnose {
            plant,
            symptoms,
            info,
        } => {
            let request = Command::disease_request(plant, symptoms, info);
            serde_json::to_value(assistant.diagnose(&request, lang).await?)?
        }
        Command::DiagnoseImage { image } => {
            let bytes = tokio::fs::read(image)
                .await
                .with_context(|| format!("Failed to read image {}", image.display()))?;
            serde_json::to_value(assistant.diagnose_image(&bytes, lang).await?)?
        }
        Command::Plan {
            location,
            season,
            plant_types,
            garden_size,
        } => {
            let request = Command::planting_request(location, season, plant_types, garden_size);
            serde_json::to_value(assistant.plan(&request, lang).await?)?
        }
        Command::Forecast { location, days } => {
            let request = Command::forecast_request(location, *days);
            serde_json::to_value(assistant.forecast(&request, lang).await?)?
        }
        Command::Translate { text, file } => match (text, file) {
            (Some(text), _) => Value::String(assistant.translate_text(text).await),
            (None, Some(path)) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let value: Value = serde_json::from_str(&content)
                    .with_context(|| format!("{} is not valid JSON", path.display()))?;
                assistant.translate(value).await
            }
            (None, None) => anyhow::bail!("either --text or --file is required"),
        },
        Command::UiLabels => serde_json::to_value(assistant.ui_labels().await)?,
    };

    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let app_config = match cli.load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    match cli.log_format(&app_config) {
        LogFormat::Json => logger::init_json_logger(cli.verbose),
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting plant-care CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = app_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        std::process::exit(report(&e));
    }

    let assistant = match PlantCareAssistant::from_config(&app_config) {
        Ok(assistant) => assistant,
        Err(e) => std::process::exit(report(&e)),
    };

    match run(&assistant, &cli).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Err(e) => {
            let code = match e.downcast_ref::<PlantCareError>() {
                Some(err) => report(err),
                None => {
                    tracing::error!("❌ {:#}", e);
                    eprintln!("❌ {:#}", e);
                    1
                }
            };

            std::process::exit(code);
        }
    }

    Ok(())
}
