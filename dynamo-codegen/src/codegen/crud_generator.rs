//! CRUD generator - one operations file for the processable tables

use minijinja::context;
use tracing::{debug, warn};

use super::context::{check_unique_names, TableContext};
use super::templates::{TemplateRenderer, CRUD_TEMPLATE};
use crate::error::Result;
use crate::parser::TableMetadata;
use crate::resolver::Resolution;

/// Remove every unprocessed table from the requested list.
///
/// Keeps request order. Names that are neither resolved nor unprocessed are
/// dropped as well, so the result only holds tables with metadata.
pub fn crud_tables<'a>(
    table_names: &[String],
    resolution: &'a Resolution,
) -> Vec<&'a TableMetadata> {
    let mut tables = Vec::with_capacity(table_names.len());
    for name in table_names {
        if resolution.unprocessed.contains_key(name) {
            debug!("Skipping CRUD for unprocessed table {}", name);
            continue;
        }
        match resolution.resolved.get(name) {
            Some(table) => tables.push(table),
            None => warn!("Skipping CRUD for {}: no metadata", name),
        }
    }
    tables
}

/// Render the CRUD template once for `tables`
pub fn generate_crud(
    renderer: &TemplateRenderer,
    tables: &[&TableMetadata],
    models_module: &str,
) -> Result<String> {
    let tables: Vec<TableContext> = tables.iter().map(|t| TableContext::new(t)).collect();
    check_unique_names(&tables)?;

    debug!("Rendering CRUD for {} tables", tables.len());
    renderer.render(
        CRUD_TEMPLATE,
        context! {
            tables => tables,
            models_module => models_module,
        },
    )
}
