pub mod config;
pub mod logging;
pub use config::{check_quality_bounds, Config, QualityConfig, ReportConfig, SampleConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("config error: {0}")]
    Config(String),
}

impl EdaError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Rejection code the request layer answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Parse(_)
            | Self::Validation(_)
            | Self::EmptyInput(_)
            | Self::Csv(_)
            | Self::Json(_)
            | Self::Parquet(_)
            | Self::Arrow(_) => 400,
            Self::Io(_) | Self::Config(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;
