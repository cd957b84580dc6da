//! Render contexts handed to the templates

use serde::Serialize;
use std::collections::HashMap;

use super::naming::{escape_field_name, pluralize, to_field_name, to_module_name, to_struct_name};
use super::type_resolver::TypeResolver;
use crate::error::{CodegenError, Result};
use crate::parser::{IndexKind, KeyAttribute, SecondaryIndex, TableMetadata};

/// Parameter names the CRUD template already uses
const RESERVED_PARAMS: &[&str] = &["client", "item"];

/// One struct field
#[derive(Debug, Clone, Serialize)]
pub struct AttributeContext {
    /// Attribute name in DynamoDB
    pub name: String,
    /// Rust field name, keyword-escaped
    pub field: String,
    /// DynamoDB type code
    pub attr_type: String,
    /// Rust type of the field
    pub rust_type: String,
    pub is_key: bool,
    /// Whether `#[serde(rename)]` is needed
    pub renamed: bool,
    /// Arguments of the field's `#[serde(..)]` attribute
    pub serde: Option<String>,
}

/// One key attribute as a function parameter
#[derive(Debug, Clone, Serialize)]
pub struct KeyContext {
    pub name: String,
    pub attr_type: String,
    /// Parameter name, keyword-escaped
    pub param: String,
    pub param_type: String,
    /// Expression encoding `param` as an `AttributeValue`
    pub attribute_value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexContext {
    pub name: String,
    pub kind: IndexKind,
    /// Suffix for generated query functions, e.g. `by_email`
    pub fn_suffix: String,
    pub partition_key: KeyContext,
    pub sort_key: Option<KeyContext>,
}

/// Everything a template needs to know about one table
#[derive(Debug, Clone, Serialize)]
pub struct TableContext {
    /// Table name in DynamoDB
    pub name: String,
    pub struct_name: String,
    pub module_name: String,
    /// Plural snake_case name for function suffixes, e.g. `users`
    pub plural: String,
    pub attributes: Vec<AttributeContext>,
    pub partition_key: KeyContext,
    pub sort_key: Option<KeyContext>,
    pub indexes: Vec<IndexContext>,
}

impl TableContext {
    pub fn new(table: &TableMetadata) -> Self {
        let attributes = table
            .attributes
            .iter()
            .map(|attr| {
                let field = escape_field_name(&attr.name);
                AttributeContext {
                    renamed: field != attr.name,
                    name: attr.name.clone(),
                    field,
                    attr_type: attr.attr_type.code().to_string(),
                    rust_type: TypeResolver::resolve(attr).to_type_string(),
                    is_key: attr.is_key,
                    serde: TypeResolver::serde_attribute(attr),
                }
            })
            .collect();

        Self {
            name: table.name.clone(),
            struct_name: to_struct_name(&table.name),
            module_name: to_module_name(&table.name),
            plural: pluralize(&to_field_name(&table.name)),
            attributes,
            partition_key: KeyContext::new(&table.partition_key),
            sort_key: table.sort_key.as_ref().map(KeyContext::new),
            indexes: table.indexes.iter().map(IndexContext::new).collect(),
        }
    }
}

impl KeyContext {
    fn new(key: &KeyAttribute) -> Self {
        let mut param = escape_field_name(&key.name);
        if RESERVED_PARAMS.contains(&param.as_str()) {
            param.push_str("_key");
        }
        let key_param = TypeResolver::key_param(key);
        Self {
            name: key.name.clone(),
            attr_type: key.attr_type.code().to_string(),
            attribute_value: key_param.encode(&param),
            param_type: key_param.param_type.to_string(),
            param,
        }
    }
}

impl IndexContext {
    fn new(index: &SecondaryIndex) -> Self {
        Self {
            name: index.name.clone(),
            kind: index.kind,
            fn_suffix: format!("by_{}", to_field_name(&index.name)),
            partition_key: KeyContext::new(&index.partition_key),
            sort_key: index.sort_key.as_ref().map(KeyContext::new),
        }
    }
}

/// Reject tables whose generated identifiers collide.
///
/// Struct and module names must be unique across tables. Field names and
/// index query functions must be unique within a table.
pub fn check_unique_names(tables: &[TableContext]) -> Result<()> {
    let mut structs: HashMap<&str, &str> = HashMap::new();
    let mut modules: HashMap<&str, &str> = HashMap::new();
    for table in tables {
        if let Some(other) = structs.insert(&table.struct_name, &table.name) {
            return Err(collision("tables", other, &table.name, "type", &table.struct_name));
        }
        if let Some(other) = modules.insert(&table.module_name, &table.name) {
            return Err(collision("tables", other, &table.name, "module", &table.module_name));
        }

        let mut fields: HashMap<&str, &str> = HashMap::new();
        for attr in &table.attributes {
            if let Some(other) = fields.insert(&attr.field, &attr.name) {
                return Err(collision(
                    &format!("table {}: attributes", table.name),
                    other,
                    &attr.name,
                    "field",
                    &attr.field,
                ));
            }
        }

        let mut queries: HashMap<&str, &str> = HashMap::new();
        for index in &table.indexes {
            if let Some(other) = queries.insert(&index.fn_suffix, &index.name) {
                return Err(collision(
                    &format!("table {}: indexes", table.name),
                    other,
                    &index.name,
                    "function",
                    &format!("query_{}", index.fn_suffix),
                ));
            }
        }
    }
    Ok(())
}

fn collision(what: &str, first: &str, second: &str, kind: &str, generated: &str) -> CodegenError {
    CodegenError::ValidationError(format!(
        "{} {} and {} both generate the {} {}",
        what, first, second, kind, generated
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{AttributeMetadata, AttributeType};

    #[test]
    fn test_table_context() {
        let table = TableMetadata {
            name: "UserEvents".to_string(),
            attributes: vec![
                AttributeMetadata {
                    name: "userId".to_string(),
                    attr_type: AttributeType::String,
                    is_key: true,
                    from_live: false,
                },
                AttributeMetadata {
                    name: "type".to_string(),
                    attr_type: AttributeType::String,
                    is_key: false,
                    from_live: false,
                },
            ],
            partition_key: KeyAttribute {
                name: "userId".to_string(),
                attr_type: AttributeType::String,
            },
            sort_key: None,
            indexes: vec![SecondaryIndex {
                name: "ByType".to_string(),
                kind: IndexKind::Global,
                partition_key: KeyAttribute {
                    name: "type".to_string(),
                    attr_type: AttributeType::String,
                },
                sort_key: None,
            }],
        };

        let ctx = TableContext::new(&table);
        assert_eq!(ctx.struct_name, "UserEvents");
        assert_eq!(ctx.module_name, "user_events");
        assert_eq!(ctx.plural, "user_events");
        assert_eq!(ctx.attributes[0].field, "user_id");
        assert!(ctx.attributes[0].renamed);
        assert_eq!(ctx.attributes[1].field, "r#type");
        assert_eq!(ctx.attributes[1].rust_type, "Option<String>");
        assert_eq!(ctx.partition_key.param, "user_id");
        assert_eq!(
            ctx.partition_key.attribute_value,
            "AttributeValue::S(user_id.to_string())"
        );
        assert_eq!(ctx.indexes[0].fn_suffix, "by_by_type");
        assert_eq!(ctx.indexes[0].partition_key.param, "r#type");
    }

    fn attribute(name: &str, is_key: bool) -> AttributeMetadata {
        AttributeMetadata {
            name: name.to_string(),
            attr_type: AttributeType::String,
            is_key,
            from_live: false,
        }
    }

    fn table(name: &str, key: &str, others: &[&str]) -> TableMetadata {
        let mut attributes = vec![attribute(key, true)];
        attributes.extend(others.iter().map(|name| attribute(name, false)));
        TableMetadata {
            name: name.to_string(),
            attributes,
            partition_key: KeyAttribute {
                name: key.to_string(),
                attr_type: AttributeType::String,
            },
            sort_key: None,
            indexes: Vec::new(),
        }
    }

    #[test]
    fn test_key_params_avoid_template_names() {
        let mut orders = table("Orders", "client", &["item"]);
        orders.sort_key = Some(KeyAttribute {
            name: "item".to_string(),
            attr_type: AttributeType::Number,
        });

        let ctx = TableContext::new(&orders);
        assert_eq!(ctx.partition_key.param, "client_key");
        assert_eq!(
            ctx.partition_key.attribute_value,
            "AttributeValue::S(client_key.to_string())"
        );
        assert_eq!(ctx.sort_key.unwrap().param, "item_key");
        // struct fields keep their names
        assert_eq!(ctx.attributes[0].field, "client");
    }

    #[test]
    fn test_field_collision_is_rejected() {
        let tables = vec![TableContext::new(&table("Users", "id", &["userId", "user_id"]))];
        let err = check_unique_names(&tables).unwrap_err();
        assert!(matches!(err, CodegenError::ValidationError(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: table Users: attributes userId and user_id both generate \
             the field user_id"
        );
    }

    #[test]
    fn test_module_collision_is_rejected() {
        let mut tables = vec![
            TableContext::new(&table("Audit", "id", &[])),
            TableContext::new(&table("Ledger", "id", &[])),
        ];
        tables[1].module_name = "audit".to_string();

        let err = check_unique_names(&tables).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: tables Audit and Ledger both generate the module audit"
        );
    }

    #[test]
    fn test_case_variants_collide() {
        let tables = vec![
            TableContext::new(&table("UserEvents", "id", &[])),
            TableContext::new(&table("user_events", "id", &[])),
        ];
        let err = check_unique_names(&tables).unwrap_err();
        assert!(err
            .to_string()
            .contains("tables UserEvents and user_events both generate the type UserEvents"));
    }

    #[test]
    fn test_index_query_collision_is_rejected() {
        let mut events = table("Events", "id", &["kind"]);
        for name in ["by-kind", "by_kind"] {
            events.indexes.push(SecondaryIndex {
                name: name.to_string(),
                kind: IndexKind::Global,
                partition_key: KeyAttribute {
                    name: "kind".to_string(),
                    attr_type: AttributeType::String,
                },
                sort_key: None,
            });
        }
        let err = check_unique_names(&[TableContext::new(&events)]).unwrap_err();
        assert!(err
            .to_string()
            .contains("indexes by-kind and by_kind both generate the function query_by_by_kind"));
    }

    #[test]
    fn test_unique_names_pass() {
        let tables = vec![
            TableContext::new(&table("Users", "user_id", &["email"])),
            TableContext::new(&table("Orders", "order_id", &["user_id"])),
        ];
        assert!(check_unique_names(&tables).is_ok());
    }
}
