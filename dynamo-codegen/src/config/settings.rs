//! Configuration settings for dynamo-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Where one generated artifact is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, created if missing
    pub folder: PathBuf,

    /// Base filename without extension
    pub filename: String,

    /// File extension without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl OutputConfig {
    fn new(folder: &str, filename: &str) -> Self {
        Self {
            folder: PathBuf::from(folder),
            filename: filename.to_string(),
            extension: default_extension(),
        }
    }

    /// Full path of the generated file
    pub fn path(&self) -> PathBuf {
        self.folder
            .join(format!("{}.{}", self.filename, self.extension))
    }

    fn validate(&self, section: &str) -> Result<()> {
        if self.folder.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(format!(
                "[{}] folder is required",
                section
            )));
        }
        if self.filename.trim().is_empty() {
            return Err(CodegenError::ValidationError(format!(
                "[{}] filename is required",
                section
            )));
        }
        if self.extension.trim().is_empty() || self.extension.starts_with('.') {
            return Err(CodegenError::ValidationError(format!(
                "[{}] extension must be non-empty and given without a leading dot",
                section
            )));
        }
        Ok(())
    }
}

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the JSON table description
    #[serde(default)]
    pub input_file: PathBuf,

    /// Model artifact location
    #[serde(default = "default_model")]
    pub model: OutputConfig,

    /// CRUD artifact location
    #[serde(default = "default_crud")]
    pub crud: OutputConfig,

    /// Module path the CRUD file imports model types from
    #[serde(default = "default_models_module")]
    pub models_module: String,

    /// Directory holding `model.jinja` and `crud.jinja` overrides
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Maximum number of DescribeTable calls in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// AWS region override
    #[serde(default)]
    pub region: Option<String>,

    /// DynamoDB endpoint override, e.g. DynamoDB Local
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// AWS shared-config profile
    #[serde(default)]
    pub profile: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,

    /// Directory for the dated log file
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Dry run mode - render without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

// Default value functions for serde
fn default_model() -> OutputConfig {
    OutputConfig::new(defaults::MODEL_FOLDER, defaults::MODEL_FILENAME)
}
fn default_crud() -> OutputConfig {
    OutputConfig::new(defaults::CRUD_FOLDER, defaults::CRUD_FILENAME)
}
fn default_extension() -> String {
    defaults::EXTENSION.to_string()
}
fn default_models_module() -> String {
    defaults::MODELS_MODULE.to_string()
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_concurrency() -> usize {
    defaults::CONCURRENCY
}
fn default_log_dir() -> PathBuf {
    PathBuf::from(defaults::LOG_DIR)
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            model: default_model(),
            crud: default_crud(),
            models_module: default_models_module(),
            templates_dir: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            concurrency: default_concurrency(),
            region: None,
            endpoint_url: None,
            profile: None,
            log_level: None,
            log_dir: default_log_dir(),
            dry_run: default_dry_run(),
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given input file
    pub fn default_with_input(input_file: PathBuf) -> Self {
        Self {
            input_file,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // Override with environment variables (DYNAMO_CODEGEN__MODEL__FOLDER, ...)
        builder = builder.add_source(
            Environment::with_prefix("DYNAMO_CODEGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "input_file is required".into(),
            ));
        }

        self.model.validate("model")?;
        self.crud.validate("crud")?;

        if self.model.path() == self.crud.path() {
            return Err(CodegenError::ValidationError(format!(
                "model and crud would both be written to {}",
                self.model.path().display()
            )));
        }

        if self.concurrency == 0 {
            return Err(CodegenError::ValidationError(
                "concurrency must be at least 1".into(),
            ));
        }

        if let Some(dir) = &self.templates_dir {
            if !dir.is_dir() {
                return Err(CodegenError::ValidationError(format!(
                    "Templates directory not found: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.include_tables, "*");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.model.path(), PathBuf::from("generated/models/models.rs"));
        assert_eq!(config.crud.path(), PathBuf::from("generated/crud/crud.rs"));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_input() {
        let config = CodegenConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let mut config = CodegenConfig::default_with_input("tables.json".into());
        assert!(config.validate().is_ok());
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_same_output_path() {
        let mut config = CodegenConfig::default_with_input("tables.json".into());
        config.crud = config.model.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("both be written"));
    }

    #[test]
    fn test_config_sections() {
        let toml_content = r#"
            log_level = "debug"
            concurrency = 4

            [model]
            folder = "out/model"
            filename = "ddb_models"

            [crud]
            folder = "out/crud"
            filename = "ddb_crud"
            extension = "py"
        "#;
        let config: CodegenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.model.path(), PathBuf::from("out/model/ddb_models.rs"));
        assert_eq!(config.crud.path(), PathBuf::from("out/crud/ddb_crud.py"));
        assert_eq!(config.models_module, "crate::models");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynamo-codegen.toml");
        std::fs::write(&path, "[model]\nfolder = \"m\"\nfilename = \"entities\"\n").unwrap();

        let config = CodegenConfig::from_file(&path).unwrap();
        assert_eq!(config.model.path(), PathBuf::from("m/entities.rs"));
        assert_eq!(config.crud, default_crud());
    }

    #[test]
    fn test_from_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[model\nfolder = ").unwrap();

        let err = CodegenConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CodegenError::ConfigError(_)));
        assert!(err.to_string().contains("broken.toml"));
    }
}
