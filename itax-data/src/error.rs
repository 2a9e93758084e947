use std::path::PathBuf;

use itax_core::{AssessmentYear, Regime, ValidationError};
use thiserror::Error;

/// Errors that can occur when loading rate schedules or slab tables.
#[derive(Debug, Error)]
pub enum ScheduleLoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("No {regime} regime schedule for assessment year {year} to attach slabs to")]
    ScheduleNotFound { year: AssessmentYear, regime: Regime },

    #[error("Invalid schedule: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<csv::Error> for ScheduleLoadError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoadError::CsvParse(err.to_string())
    }
}

/// Errors that can occur when loading employee inputs.
#[derive(Debug, Error)]
pub enum InputLoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid input for employee '{employee_id}': {source}")]
    Invalid {
        employee_id: String,
        #[source]
        source: ValidationError,
    },
}
