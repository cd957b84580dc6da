//! Error types for dynamo-codegen

use thiserror::Error;

/// Result type alias for dynamo-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::ValidationError(format!("Input is not valid JSON: {}", err))
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}

impl From<minijinja::Error> for CodegenError {
    fn from(err: minijinja::Error) -> Self {
        // The alternate form includes the template name and line.
        CodegenError::TemplateError(format!("{:#}", err))
    }
}
