//! Input JSON validation

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use super::metadata::*;
use crate::error::{CodegenError, Result};

/// One entry of the input document, before validation
#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(alias = "name")]
    table: String,

    #[serde(alias = "attributes")]
    attrs: IndexMap<String, AttributeType>,

    #[serde(default)]
    key_schema: Option<KeySchema>,
}

/// Read and validate an input file
pub fn parse_input_file(path: &Path) -> Result<InputSchema> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        CodegenError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to read input file {}: {}", path.display(), e),
        ))
    })?;
    parse_input(&json)
}

/// Parse and validate the JSON table description.
///
/// Accepts either a top-level array of tables or an object with a `tables`
/// array. Each table needs a `table` name and an `attrs` object mapping
/// attribute names to DynamoDB type codes. Repeated table names keep the first
/// entry.
pub fn parse_input(json: &str) -> Result<InputSchema> {
    let document: Value = serde_json::from_str(json)?;

    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("tables") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(CodegenError::ValidationError(
                    "`tables` must be an array".into(),
                ))
            }
            None => {
                return Err(CodegenError::ValidationError(
                    "expected an array of tables or an object with a `tables` array".into(),
                ))
            }
        },
        _ => {
            return Err(CodegenError::ValidationError(
                "expected an array of tables or an object with a `tables` array".into(),
            ))
        }
    };

    if entries.is_empty() {
        return Err(CodegenError::ValidationError(
            "input declares no tables".into(),
        ));
    }

    let mut schema = InputSchema::default();
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            return Err(CodegenError::ValidationError(format!(
                "table entry {} must be an object",
                index
            )));
        }
        let raw: RawTable = serde_json::from_value(entry).map_err(|e| {
            CodegenError::ValidationError(format!("table entry {}: {}", index, e))
        })?;
        let spec = validate_table(raw)?;

        if schema.tables.contains_key(&spec.name) {
            warn!("Table {} is declared more than once, keeping the first entry", spec.name);
            continue;
        }
        debug!("Validated table {} ({} attributes)", spec.name, spec.attributes.len());
        schema.tables.insert(spec.name.clone(), spec);
    }

    Ok(schema)
}

fn validate_table(raw: RawTable) -> Result<TableSpec> {
    let name = raw.table.trim().to_string();
    validate_table_name(&name)?;

    for attr_name in raw.attrs.keys() {
        if attr_name.trim().is_empty() {
            return Err(CodegenError::ValidationError(format!(
                "table {}: attribute names must not be empty",
                name
            )));
        }
    }

    if let Some(keys) = &raw.key_schema {
        let key_names = std::iter::once(&keys.partition_key).chain(keys.sort_key.as_ref());
        for key in key_names {
            let attr_type = raw.attrs.get(key).ok_or_else(|| {
                CodegenError::ValidationError(format!(
                    "table {}: key attribute `{}` is not declared in attrs",
                    name, key
                ))
            })?;
            if !attr_type.is_key_type() {
                return Err(CodegenError::ValidationError(format!(
                    "table {}: key attribute `{}` has type {}, keys must be S, N or B",
                    name, key, attr_type
                )));
            }
        }
        if keys.sort_key.as_ref() == Some(&keys.partition_key) {
            return Err(CodegenError::ValidationError(format!(
                "table {}: partition key and sort key must differ",
                name
            )));
        }
    }

    Ok(TableSpec {
        name,
        attributes: raw.attrs,
        key_schema: raw.key_schema,
    })
}

/// DynamoDB table names: 3-255 characters of `[A-Za-z0-9_.-]`
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if name.len() < 3 || name.len() > 255 || !valid_chars {
        return Err(CodegenError::InvalidTableName(name.to_string()));
    }
    Ok(())
}
