//! Live table metadata sources

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::parser::IndexKind;

/// Why a table could not be resolved. Recorded per table, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("table not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("metadata mismatch: {0}")]
    Reconcile(String),
}

/// Role of an attribute inside a key schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Hash,
    Range,
}

/// One element of a live key schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveKeyElement {
    pub attribute_name: String,
    pub role: KeyRole,
}

/// Secondary index as described by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveIndex {
    pub name: String,
    pub kind: IndexKind,
    pub key_schema: Vec<LiveKeyElement>,
}

/// The parts of a DescribeTable response used for reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveTable {
    pub name: String,
    pub key_schema: Vec<LiveKeyElement>,
    /// Attribute name -> raw scalar type code (`S`, `N`, `B`)
    pub attribute_definitions: Vec<(String, String)>,
    pub indexes: Vec<LiveIndex>,
}

impl LiveTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a HASH key and its attribute definition
    pub fn hash_key(mut self, name: &str, attr_type: &str) -> Self {
        self.push_key(name, attr_type, KeyRole::Hash);
        self
    }

    /// Add a RANGE key and its attribute definition
    pub fn range_key(mut self, name: &str, attr_type: &str) -> Self {
        self.push_key(name, attr_type, KeyRole::Range);
        self
    }

    /// Add a secondary index. Its key attributes must be defined separately.
    pub fn index(mut self, name: &str, kind: IndexKind, hash: &str, range: Option<&str>) -> Self {
        let mut key_schema = vec![LiveKeyElement {
            attribute_name: hash.to_string(),
            role: KeyRole::Hash,
        }];
        if let Some(range) = range {
            key_schema.push(LiveKeyElement {
                attribute_name: range.to_string(),
                role: KeyRole::Range,
            });
        }
        self.indexes.push(LiveIndex {
            name: name.to_string(),
            kind,
            key_schema,
        });
        self
    }

    /// Add an attribute definition without a table key role
    pub fn attribute(mut self, name: &str, attr_type: &str) -> Self {
        self.define(name, attr_type);
        self
    }

    fn push_key(&mut self, name: &str, attr_type: &str, role: KeyRole) {
        self.key_schema.push(LiveKeyElement {
            attribute_name: name.to_string(),
            role,
        });
        self.define(name, attr_type);
    }

    fn define(&mut self, name: &str, attr_type: &str) {
        if !self.attribute_definitions.iter().any(|(n, _)| n == name) {
            self.attribute_definitions
                .push((name.to_string(), attr_type.to_string()));
        }
    }

    /// Attribute name with the given role in the table key schema
    pub fn key(&self, role: KeyRole) -> Option<&str> {
        self.key_schema
            .iter()
            .find(|k| k.role == role)
            .map(|k| k.attribute_name.as_str())
    }
}

/// Read-only lookup of live table metadata.
///
/// Each call is independent; a failure only affects the named table.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Describe one table.
    async fn describe_table(&self, table_name: &str) -> Result<LiveTable, ResolveError>;
}

/// Metadata source backed by a fixed set of tables.
///
/// Tables that were never added resolve to [`ResolveError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataSource {
    tables: HashMap<String, Result<LiveTable, ResolveError>>,
}

impl InMemoryMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table that describes successfully
    pub fn with_table(mut self, table: LiveTable) -> Self {
        self.tables.insert(table.name.clone(), Ok(table));
        self
    }

    /// Register a table whose lookup fails with `error`
    pub fn with_error(mut self, table_name: &str, error: ResolveError) -> Self {
        self.tables.insert(table_name.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl MetadataSource for InMemoryMetadataSource {
    async fn describe_table(&self, table_name: &str) -> Result<LiveTable, ResolveError> {
        self.tables.get(table_name).cloned().unwrap_or_else(|| {
            Err(ResolveError::NotFound(format!(
                "Requested resource not found: Table: {} not found",
                table_name
            )))
        })
    }
}
