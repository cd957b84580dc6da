//! Main code generator orchestrator

use std::path::PathBuf;
use tracing::info;

use crate::config::CodegenConfig;
use crate::error::Result;
use crate::resolver::Resolution;

pub use super::crud_generator::{crud_tables, generate_crud};
pub use super::model_generator::generate_model;
use super::templates::TemplateRenderer;
use super::writer::write_output;

/// Both artifacts, rendered but not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub model_path: PathBuf,
    pub model: String,
    pub crud_path: PathBuf,
    pub crud: String,
}

/// Main code generator that renders and writes the model and CRUD files
pub struct CodeGenerator<'a> {
    config: &'a CodegenConfig,
    renderer: TemplateRenderer,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator, loading templates from the configuration
    pub fn new(config: &'a CodegenConfig) -> Result<Self> {
        let renderer = TemplateRenderer::new(config.templates_dir.as_deref())?;
        Ok(Self::with_renderer(config, renderer))
    }

    /// Create a new code generator with an explicit renderer
    pub fn with_renderer(config: &'a CodegenConfig, renderer: TemplateRenderer) -> Self {
        Self { config, renderer }
    }

    /// Render both artifacts. Nothing is written.
    pub fn render(
        &self,
        table_names: &[String],
        resolution: &Resolution,
    ) -> Result<RenderedOutput> {
        info!("Generating Model ....");
        let model = generate_model(&self.renderer, resolution)?;

        info!("Generating CRUD ....");
        let tables = crud_tables(table_names, resolution);
        let crud = generate_crud(&self.renderer, &tables, &self.config.models_module)?;

        Ok(RenderedOutput {
            model_path: self.config.model.path(),
            model,
            crud_path: self.config.crud.path(),
            crud,
        })
    }

    /// Write previously rendered artifacts
    pub fn write(&self, output: &RenderedOutput) -> Result<()> {
        write_output(&output.model_path, &output.model)?;
        info!("Model generated: {}", output.model_path.display());
        write_output(&output.crud_path, &output.crud)?;
        info!("CRUD generated: {}", output.crud_path.display());
        Ok(())
    }

    /// Render both artifacts, then write them
    pub fn generate(
        &self,
        table_names: &[String],
        resolution: &Resolution,
    ) -> Result<RenderedOutput> {
        let output = self.render(table_names, resolution)?;
        self.write(&output)?;
        Ok(output)
    }
}
