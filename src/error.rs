use std::path::PathBuf;

use thiserror::Error;

use crate::core::{ComputationError, ValidationError};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("projection invariant violated: {0}")]
    Computation(#[from] ComputationError),

    #[error("unsupported config format for {}; use .json, .yaml or .yml", .0.display())]
    UnsupportedConfigFormat(PathBuf),

    #[error("invalid answer for {prompt}: {reason}")]
    Prompt { prompt: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
