//! dynamo-codegen: Generate model and CRUD source files for DynamoDB tables
//!
//! This crate provides both a CLI tool and a library. Given a JSON description
//! of DynamoDB tables it:
//!
//! - validates the description into table specs,
//! - looks up each table with `DescribeTable` and reconciles the declared
//!   attributes with the live key schema,
//! - renders one model file and one CRUD file from templates.
//!
//! Tables whose lookup fails are reported as unprocessed and left out of both
//! files; the rest of the run continues.
//!
//! # Input
//!
//! ```json
//! [
//!   {
//!     "table": "Users",
//!     "attrs": { "user_id": "S", "email": "S", "age": "N" },
//!     "key_schema": { "partition_key": "user_id" }
//!   }
//! ]
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! dynamo-codegen --file tables.json --config dynamo-codegen.toml
//! ```
//!
//! # Programmatic Usage
//!
//! ```rust,ignore
//! let report = dynamo_codegen::CodegenBuilder::new("tables.json")
//!     .model_output("src/generated", "models")
//!     .crud_output("src/generated", "crud")
//!     .generate()
//!     .await?;
//! if report.has_unprocessed() {
//!     print!("{}", report.unprocessed_summary());
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parser;
pub mod resolver;

use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use config::CodegenConfig;
pub use error::{CodegenError, Result};
pub use resolver::{MetadataSource, ResolveError};

/// What a generation run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Model file path (not written on a dry run)
    pub model_path: PathBuf,

    /// CRUD file path (not written on a dry run)
    pub crud_path: PathBuf,

    /// Tables present in both outputs, in input order
    pub resolved: Vec<String>,

    /// Tables left out, with the reason
    pub unprocessed: IndexMap<String, ResolveError>,

    /// Whether files were left unwritten
    pub dry_run: bool,
}

impl GenerationReport {
    /// Check if any table failed to resolve
    pub fn has_unprocessed(&self) -> bool {
        !self.unprocessed.is_empty()
    }

    /// End-of-run summary of unprocessed tables
    pub fn unprocessed_summary(&self) -> String {
        resolver::unprocessed_summary(&self.unprocessed)
    }
}

/// Main entry point for code generation against DynamoDB
pub async fn generate(config: &CodegenConfig) -> Result<GenerationReport> {
    let source = resolver::DynamoMetadataSource::from_config(config).await;
    generate_with_source(config, &source).await
}

/// Run generation with an explicit metadata source.
///
/// Input and template errors abort before anything is written. Lookup
/// failures only drop the affected table.
pub async fn generate_with_source<S>(
    config: &CodegenConfig,
    source: &S,
) -> Result<GenerationReport>
where
    S: MetadataSource + ?Sized,
{
    config.validate()?;

    info!("Reading input: {:?}", config.input_file);
    let schema = parser::parse_input_file(&config.input_file)?;
    info!("Found {} tables", schema.len());

    let table_names = filter_tables(
        schema.table_names(),
        &config.include_tables,
        &config.exclude_tables,
    );
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        table_names.len(),
        config.include_tables,
        config.exclude_tables
    );

    // Load templates before any network call so template errors fail fast
    let generator = codegen::CodeGenerator::new(config)?;

    let resolution =
        resolver::resolve_tables(source, &table_names, &schema, config.concurrency).await;
    info!("Resolved tables: {:?}", resolution.resolved.keys().collect::<Vec<_>>());
    if resolution.has_unprocessed() {
        warn!("Unprocessed tables: {:?}", resolution.unprocessed);
    }

    let output = generator.render(&table_names, &resolution)?;
    if config.dry_run {
        info!("Dry run, skipping writes");
    } else {
        generator.write(&output)?;
    }

    info!("Code generation complete");
    Ok(GenerationReport {
        model_path: output.model_path,
        crud_path: output.crud_path,
        resolved: resolution.resolved.keys().cloned().collect(),
        unprocessed: resolution.unprocessed,
        dry_run: config.dry_run,
    })
}

/// Filter table names based on include/exclude patterns
fn filter_tables(tables: Vec<String>, include: &str, exclude: &str) -> Vec<String> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tables
        .into_iter()
        .filter(|name| {
            let included = include_all || include_set.contains(name);
            let excluded = exclude_set.contains(name);
            included && !excluded
        })
        .collect()
}

/// Builder pattern for programmatic configuration
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given input file
    pub fn new(input_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_input(input_file.as_ref().to_path_buf()),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: CodegenConfig) -> Self {
        Self { config }
    }

    /// Set the model output folder and base filename
    pub fn model_output(mut self, folder: impl AsRef<Path>, filename: &str) -> Self {
        self.config.model.folder = folder.as_ref().to_path_buf();
        self.config.model.filename = filename.to_string();
        self
    }

    /// Set the CRUD output folder and base filename
    pub fn crud_output(mut self, folder: impl AsRef<Path>, filename: &str) -> Self {
        self.config.crud.folder = folder.as_ref().to_path_buf();
        self.config.crud.filename = filename.to_string();
        self
    }

    /// Set the extension of both output files
    pub fn extension(mut self, extension: &str) -> Self {
        self.config.model.extension = extension.to_string();
        self.config.crud.extension = extension.to_string();
        self
    }

    /// Set the module path the CRUD file imports models from
    pub fn models_module(mut self, module: &str) -> Self {
        self.config.models_module = module.to_string();
        self
    }

    /// Load `model.jinja` / `crud.jinja` overrides from a directory
    pub fn templates_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.templates_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Set the number of lookups in flight
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the AWS region
    pub fn region(mut self, region: &str) -> Self {
        self.config.region = Some(region.to_string());
        self
    }

    /// Point the client at another endpoint, e.g. DynamoDB Local
    pub fn endpoint_url(mut self, url: &str) -> Self {
        self.config.endpoint_url = Some(url.to_string());
        self
    }

    /// Enable dry run mode (render without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// The configuration built so far
    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate against DynamoDB
    pub async fn generate(self) -> Result<GenerationReport> {
        generate(&self.config).await
    }

    /// Generate against the given metadata source
    pub async fn generate_with_source<S>(self, source: &S) -> Result<GenerationReport>
    where
        S: MetadataSource + ?Sized,
    {
        generate_with_source(&self.config, source).await
    }
}
