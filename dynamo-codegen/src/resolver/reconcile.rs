//! Merge declared table specs with live metadata

use indexmap::IndexMap;
use tracing::warn;

use super::source::{KeyRole, LiveKeyElement, LiveTable, ResolveError};
use crate::parser::{
    AttributeMetadata, AttributeType, KeyAttribute, SecondaryIndex, TableMetadata, TableSpec,
};

/// Reconcile a declared table with its live description.
///
/// Live metadata wins for everything it knows about: key schema, key attribute
/// types and index key types. Declared attributes the store does not describe
/// (DynamoDB only reports key attributes) keep their declared type.
pub fn reconcile(spec: &TableSpec, live: &LiveTable) -> Result<TableMetadata, ResolveError> {
    let live_types = live_attribute_types(live)?;

    let partition_key = live_key(&live.key_schema, KeyRole::Hash, &live_types)?.ok_or_else(|| {
        ResolveError::Reconcile(format!("table {} has no HASH key", spec.name))
    })?;
    let sort_key = live_key(&live.key_schema, KeyRole::Range, &live_types)?;

    if let Some(declared) = &spec.key_schema {
        let live_sort = sort_key.as_ref().map(|k| k.name.as_str());
        if declared.partition_key != partition_key.name
            || declared.sort_key.as_deref() != live_sort
        {
            warn!(
                "Table {}: declared key ({}, {:?}) differs from live key ({}, {:?}), \
                 using live key",
                spec.name, declared.partition_key, declared.sort_key, partition_key.name, live_sort
            );
        }
    }

    let mut attributes: IndexMap<String, AttributeMetadata> = IndexMap::new();
    for key in std::iter::once(&partition_key).chain(sort_key.as_ref()) {
        attributes.insert(
            key.name.clone(),
            AttributeMetadata {
                name: key.name.clone(),
                attr_type: key.attr_type,
                is_key: true,
                from_live: !spec.attributes.contains_key(&key.name),
            },
        );
    }

    for (name, declared_type) in &spec.attributes {
        let attr_type = match live_types.get(name.as_str()) {
            Some(live_type) => {
                if live_type != declared_type {
                    warn!(
                        "Table {}: attribute {} declared as {} but defined as {}, using {}",
                        spec.name, name, declared_type, live_type, live_type
                    );
                }
                *live_type
            }
            None => *declared_type,
        };
        attributes
            .entry(name.clone())
            .or_insert_with(|| AttributeMetadata {
                name: name.clone(),
                attr_type,
                is_key: false,
                from_live: false,
            });
    }

    // Index keys the user did not declare
    for (name, attr_type) in &live_types {
        if !attributes.contains_key(*name) {
            attributes.insert(
                name.to_string(),
                AttributeMetadata {
                    name: name.to_string(),
                    attr_type: *attr_type,
                    is_key: false,
                    from_live: true,
                },
            );
        }
    }

    let mut indexes = Vec::with_capacity(live.indexes.len());
    for index in &live.indexes {
        let index_partition = live_key(&index.key_schema, KeyRole::Hash, &live_types)?
            .ok_or_else(|| {
                ResolveError::Reconcile(format!(
                    "index {} on table {} has no HASH key",
                    index.name, spec.name
                ))
            })?;
        indexes.push(SecondaryIndex {
            name: index.name.clone(),
            kind: index.kind,
            partition_key: index_partition,
            sort_key: live_key(&index.key_schema, KeyRole::Range, &live_types)?,
        });
    }

    Ok(TableMetadata {
        name: spec.name.clone(),
        attributes: attributes.into_values().collect(),
        partition_key,
        sort_key,
        indexes,
    })
}

fn live_attribute_types(live: &LiveTable) -> Result<IndexMap<&str, AttributeType>, ResolveError> {
    let mut types = IndexMap::new();
    for (name, code) in &live.attribute_definitions {
        let attr_type: AttributeType = code.parse().map_err(|e| {
            ResolveError::Reconcile(format!("attribute {} on table {}: {}", name, live.name, e))
        })?;
        if !attr_type.is_key_type() {
            return Err(ResolveError::Reconcile(format!(
                "attribute {} on table {} is defined as {}, expected S, N or B",
                name, live.name, attr_type
            )));
        }
        types.insert(name.as_str(), attr_type);
    }
    Ok(types)
}

fn live_key(
    schema: &[LiveKeyElement],
    role: KeyRole,
    live_types: &IndexMap<&str, AttributeType>,
) -> Result<Option<KeyAttribute>, ResolveError> {
    let Some(element) = schema.iter().find(|k| k.role == role) else {
        return Ok(None);
    };
    let attr_type = live_types
        .get(element.attribute_name.as_str())
        .copied()
        .ok_or_else(|| {
            ResolveError::Reconcile(format!(
                "key attribute {} has no attribute definition",
                element.attribute_name
            ))
        })?;
    Ok(Some(KeyAttribute {
        name: element.attribute_name.clone(),
        attr_type,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_input, IndexKind};

    fn users_spec() -> TableSpec {
        let schema = parse_input(
            r#"[{"table": "Users", "attrs": {"email": "S", "user_id": "N", "active": "BOOL"},
                 "key_schema": {"partition_key": "user_id"}}]"#,
        )
        .unwrap();
        schema.get("Users").unwrap().clone()
    }

    #[test]
    fn test_live_key_type_overrides_declared() {
        let live = LiveTable::new("Users").hash_key("user_id", "S");
        let table = reconcile(&users_spec(), &live).unwrap();

        assert_eq!(table.partition_key.name, "user_id");
        assert_eq!(table.partition_key.attr_type, AttributeType::String);
        assert!(table.sort_key.is_none());

        let names: Vec<&str> = table.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["user_id", "email", "active"]);
        let user_id = table.get_attribute("user_id").unwrap();
        assert!(user_id.is_key);
        assert!(!user_id.from_live);
        assert_eq!(user_id.attr_type, AttributeType::String);
    }

    #[test]
    fn test_live_keys_and_index_attributes_are_added() {
        let live = LiveTable::new("Users")
            .hash_key("tenant", "S")
            .range_key("user_id", "N")
            .attribute("signup_day", "S")
            .index("by_signup", IndexKind::Global, "signup_day", Some("user_id"));
        let table = reconcile(&users_spec(), &live).unwrap();

        let names: Vec<&str> = table.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["tenant", "user_id", "email", "active", "signup_day"]);
        assert!(table.get_attribute("tenant").unwrap().from_live);
        assert!(table.has_composite_key());
        assert!(table.is_key_attribute("user_id"));
        assert!(!table.is_key_attribute("signup_day"));

        assert_eq!(table.indexes.len(), 1);
        let index = &table.indexes[0];
        assert_eq!(index.partition_key.name, "signup_day");
        assert_eq!(index.sort_key.as_ref().unwrap().attr_type, AttributeType::Number);
    }

    #[test]
    fn test_missing_hash_key_is_reconcile_error() {
        let live = LiveTable::new("Users").attribute("user_id", "S");
        assert!(matches!(
            reconcile(&users_spec(), &live),
            Err(ResolveError::Reconcile(_))
        ));
    }

    #[test]
    fn test_undefined_key_attribute_is_reconcile_error() {
        let mut live = LiveTable::new("Users").hash_key("user_id", "S");
        live.attribute_definitions.clear();
        let err = reconcile(&users_spec(), &live).unwrap_err();
        assert!(err.to_string().contains("no attribute definition"));
    }

    #[test]
    fn test_non_scalar_definition_is_reconcile_error() {
        let live = LiveTable::new("Users").hash_key("user_id", "BOOL");
        assert!(matches!(
            reconcile(&users_spec(), &live),
            Err(ResolveError::Reconcile(_))
        ));
    }
}
