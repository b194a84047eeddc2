use std::path::PathBuf;
use thiserror::Error;

/// Errors of library operations that span several modules.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Review error: {0}")]
    Review(#[from] crate::review::ReviewError),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid file pattern for source '{source_name}': {reason}")]
    InvalidPattern { source_name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, HarvestError>;
