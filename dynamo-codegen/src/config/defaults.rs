//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Default output directory for the model file
pub const MODEL_FOLDER: &str = "generated/models";

/// Default base filename for the model file
pub const MODEL_FILENAME: &str = "models";

/// Default output directory for the CRUD file
pub const CRUD_FOLDER: &str = "generated/crud";

/// Default base filename for the CRUD file
pub const CRUD_FILENAME: &str = "crud";

/// Default extension for both generated files
pub const EXTENSION: &str = "rs";

/// Module path the generated CRUD file imports model types from
pub const MODELS_MODULE: &str = "crate::models";

/// Metadata lookups in flight at once
pub const CONCURRENCY: usize = 1;

/// Directory for the dated log file
pub const LOG_DIR: &str = ".";

/// Config file looked up in the working directory when `--config` is absent
pub const CONFIG_FILE: &str = "dynamo-codegen.toml";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;
