//! Error types for expview-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {0}")]
    InputNotFound(String),
}

pub type Result<T> = std::result::Result<T, ExpviewError>;
