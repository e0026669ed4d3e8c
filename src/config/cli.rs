use crate::domain::model::{
    DiseaseRequest, PlantingPlanRequest, WeatherForecastRequest, DEFAULT_FORECAST_DAYS,
};
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Diagnose plant diseases from a symptom description
    Diagnose {
        #[arg(long)]
        plant: String,
        #[arg(long)]
        symptoms: String,
        #[arg(long)]
        info: Option<String>,
    },
    /// Diagnose plant diseases from a photo of the affected plant
    DiagnoseImage {
        #[arg(long)]
        image: PathBuf,
    },
    /// Get a seasonal planting plan
    Plan {
        #[arg(long)]
        location: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long, value_delimiter = ',')]
        plant_types: Vec<String>,
        #[arg(long)]
        garden_size: Option<String>,
    },
    /// Get a weather forecast with agricultural advice
    Forecast {
        #[arg(long)]
        location: String,
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: u32,
    },
    /// Translate text, or every string in a JSON file, to Bangla
    Translate {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the cached English/Bangla UI label table
    UiLabels,
}

impl Command {
    pub fn disease_request(plant: &str, symptoms: &str, info: &Option<String>) -> DiseaseRequest {
        DiseaseRequest {
            plant_name: plant.to_string(),
            disease_description: symptoms.to_string(),
            additional_info: info.clone(),
        }
    }

    pub fn planting_request(
        location: &str,
        season: &Option<String>,
        plant_types: &[String],
        garden_size: &Option<String>,
    ) -> PlantingPlanRequest {
        PlantingPlanRequest {
            location: location.to_string(),
            season: season.clone(),
            // 空清單與未指定同義
            plant_types: if plant_types.is_empty() {
                None
            } else {
                Some(plant_types.to_vec())
            },
            garden_size: garden_size.clone(),
        }
    }

    pub fn forecast_request(location: &str, days: u32) -> WeatherForecastRequest {
        WeatherForecastRequest {
            location: location.to_string(),
            days,
        }
    }
}
