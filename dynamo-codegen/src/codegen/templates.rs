//! Template loading and rendering
//!
//! Templates are rendered with auto-escaping disabled: the output is source
//! code, and HTML escaping would corrupt quotes and angle brackets.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use super::naming::{escape_field_name, pluralize, to_field_name, to_struct_name};
use crate::error::{CodegenError, Result};

/// Template name for the model artifact
pub const MODEL_TEMPLATE: &str = "model.jinja";

/// Template name for the CRUD artifact
pub const CRUD_TEMPLATE: &str = "crud.jinja";

const BUILTIN_MODEL: &str = include_str!("../../templates/model.jinja");
const BUILTIN_CRUD: &str = include_str!("../../templates/crud.jinja");

/// Holds the parsed model and CRUD templates
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Renderer using the built-in Rust templates
    pub fn builtin() -> Result<Self> {
        Self::with_templates(BUILTIN_MODEL.to_string(), BUILTIN_CRUD.to_string())
    }

    /// Renderer using `model.jinja` and `crud.jinja` from `dir`.
    ///
    /// A template missing from `dir` falls back to the built-in one.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let model =
            read_override(dir, MODEL_TEMPLATE)?.unwrap_or_else(|| BUILTIN_MODEL.to_string());
        let crud =
            read_override(dir, CRUD_TEMPLATE)?.unwrap_or_else(|| BUILTIN_CRUD.to_string());
        Self::with_templates(model, crud)
    }

    /// Renderer for the optional templates directory
    pub fn new(templates_dir: Option<&Path>) -> Result<Self> {
        match templates_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Renderer with explicit template sources
    pub fn with_templates(model: String, crud: String) -> Result<Self> {
        let mut env = environment();
        env.add_template_owned(MODEL_TEMPLATE, model)?;
        env.add_template_owned(CRUD_TEMPLATE, crud)?;
        Ok(Self { env })
    }

    /// Render one template with the given context
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}

fn read_override(dir: &Path, name: &str) -> Result<Option<String>> {
    let path = dir.join(name);
    if !path.is_file() {
        debug!("No {} in {}, using built-in template", name, dir.display());
        return Ok(None);
    }
    debug!("Loading template {}", path.display());
    std::fs::read_to_string(&path).map(Some).map_err(|e| {
        CodegenError::TemplateError(format!("Failed to read {}: {}", path.display(), e))
    })
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);

    env.add_filter("pascal_case", |value: String| to_struct_name(&value));
    env.add_filter("snake_case", |value: String| to_field_name(&value));
    env.add_filter("field_name", |value: String| escape_field_name(&value));
    env.add_filter("plural", |value: String| pluralize(&value));
    env
}
