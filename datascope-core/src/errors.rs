//! Error types for DataScope

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataScopeError>;

#[derive(Error, Debug)]
pub enum DataScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No data available for analysis")]
    NoData,

    #[error("Other error: {0}")]
    Other(String),
}
