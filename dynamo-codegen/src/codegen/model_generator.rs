//! Model generator - one data-model file for all resolved tables

use minijinja::context;
use tracing::debug;

use super::context::{check_unique_names, TableContext};
use super::templates::{TemplateRenderer, MODEL_TEMPLATE};
use crate::error::Result;
use crate::resolver::Resolution;

/// Render the model template for every resolved table.
///
/// Unprocessed tables are never part of `resolution.resolved`, so they cannot
/// reach the output.
pub fn generate_model(renderer: &TemplateRenderer, resolution: &Resolution) -> Result<String> {
    let tables: Vec<TableContext> = resolution
        .resolved_tables()
        .into_iter()
        .map(TableContext::new)
        .collect();
    check_unique_names(&tables)?;

    debug!("Rendering model for {} tables", tables.len());
    renderer.render(MODEL_TEMPLATE, context! { tables => tables })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodegenError;
    use crate::parser::parse_input;
    use crate::resolver::{reconcile, LiveTable, ResolveError};

    fn resolution() -> Resolution {
        let schema = parse_input(
            r#"[{"table": "Users", "attrs": {"user_id": "S", "nickname": "S", "tags": "SS"}}]"#,
        )
        .unwrap();
        let users = reconcile(
            schema.get("Users").unwrap(),
            &LiveTable::new("Users").hash_key("user_id", "S"),
        )
        .unwrap();

        let mut resolution = Resolution::default();
        resolution.resolved.insert("Users".to_string(), users);
        resolution
            .unprocessed
            .insert("Orders".to_string(), ResolveError::NotFound("Orders".into()));
        resolution
    }

    #[test]
    fn test_generate_model() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let code = generate_model(&renderer, &resolution()).unwrap();

        assert_eq!(code.matches("pub struct ").count(), 1);
        assert!(code.contains("pub struct Users {"));
        assert!(code.contains("    pub user_id: String,"));
        assert!(code.contains("    pub nickname: Option<String>,"));
        assert!(code.contains("    pub tags: std::collections::HashSet<String>,"));
        assert!(code.contains(
            "    #[serde(default, with = \"serde_dynamo::string_set\", \
             skip_serializing_if = \"std::collections::HashSet::is_empty\")]"
        ));
        assert!(code.contains("pub const TABLE_NAME: &'static str = \"Users\";"));
        assert!(!code.contains("Orders"));
        assert!(!code.contains("&lt;"));
    }

    #[test]
    fn test_generate_model_is_deterministic() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let first = generate_model(&renderer, &resolution()).unwrap();
        let second = generate_model(&renderer, &resolution()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_colliding_struct_names() {
        let mut resolution = resolution();
        let mut clash = resolution.resolved["Users"].clone();
        clash.name = "users".to_string();
        resolution.resolved.insert("users".to_string(), clash);

        let renderer = TemplateRenderer::builtin().unwrap();
        let err = generate_model(&renderer, &resolution).unwrap_err();
        assert!(err.to_string().contains("both generate the type Users"));
    }

    #[test]
    fn test_colliding_field_names() {
        let schema = parse_input(
            r#"[{"table": "Users", "attrs": {"user_id": "S", "userId": "N"}}]"#,
        )
        .unwrap();
        let users = reconcile(
            schema.get("Users").unwrap(),
            &LiveTable::new("Users").hash_key("user_id", "S"),
        )
        .unwrap();
        let mut resolution = Resolution::default();
        resolution.resolved.insert("Users".to_string(), users);

        let renderer = TemplateRenderer::builtin().unwrap();
        let err = generate_model(&renderer, &resolution).unwrap_err();
        assert!(matches!(err, CodegenError::ValidationError(_)));
        assert!(err
            .to_string()
            .contains("attributes user_id and userId both generate the field user_id"));
    }

    #[test]
    fn test_table_named_self() {
        let schema = parse_input(r#"[{"table": "self", "attrs": {"id": "S"}}]"#).unwrap();
        let live = LiveTable::new("self").hash_key("id", "S");
        let table = reconcile(schema.get("self").unwrap(), &live).unwrap();
        let mut resolution = Resolution::default();
        resolution.resolved.insert("self".to_string(), table);

        let renderer = TemplateRenderer::builtin().unwrap();
        let code = generate_model(&renderer, &resolution).unwrap();
        assert!(code.contains("pub struct TSelf {"));
        assert!(!code.contains("pub struct Self"));
    }
}
