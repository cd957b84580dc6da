//! CLI entry point for dynamo-codegen

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use dynamo_codegen::config::CodegenConfig;
use dynamo_codegen::logging;

#[derive(Parser)]
#[command(name = "dynamo-codegen")]
#[command(about = "Generate model and CRUD source files for DynamoDB tables")]
#[command(version)]
struct Cli {
    /// JSON file with the DynamoDB table names and attribute definitions
    #[arg(short, long)]
    file: PathBuf,

    /// Path to configuration file (TOML format, defaults to ./dynamo-codegen.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dry run - resolve and render without writing files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = match CodegenConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _logger = logging::init_fallback()?;
            error!("Error: {}", e);
            return Err(e.into());
        }
    };
    config.input_file = cli.file;
    if cli.dry_run {
        config.dry_run = true;
    }

    let logger = logging::init(&config)?;
    info!("Logging to {}", logger.path().display());

    if let Err(e) = config.validate() {
        error!("Error: {}", e);
        return Err(e.into());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let report = runtime
        .block_on(dynamo_codegen::generate(&config))
        .inspect_err(|e| error!("Error: {}", e))?;

    if report.dry_run {
        println!("Dry run mode - would generate:");
        println!("  Model: {}", report.model_path.display());
        println!("  CRUD:  {}", report.crud_path.display());
        println!("  Tables: {}", report.resolved.join(", "));
    }

    // End-of-run warning for tables left out of both files
    if report.has_unprocessed() {
        print!("{}", report.unprocessed_summary());
    }

    Ok(())
}
