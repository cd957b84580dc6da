//! Metadata structures for declared and resolved DynamoDB tables

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DynamoDB attribute type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributeType {
    /// `S`
    String,
    /// `N`
    Number,
    /// `B`
    Binary,
    /// `BOOL`
    Bool,
    /// `SS`
    StringSet,
    /// `NS`
    NumberSet,
    /// `BS`
    BinarySet,
    /// `L`
    List,
    /// `M`
    Map,
    /// `NULL`
    Null,
}

impl AttributeType {
    /// The wire code DynamoDB uses for this type
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
            AttributeType::Bool => "BOOL",
            AttributeType::StringSet => "SS",
            AttributeType::NumberSet => "NS",
            AttributeType::BinarySet => "BS",
            AttributeType::List => "L",
            AttributeType::Map => "M",
            AttributeType::Null => "NULL",
        }
    }

    /// Only scalar S, N and B attributes can be part of a key
    pub fn is_key_type(&self) -> bool {
        matches!(
            self,
            AttributeType::String | AttributeType::Number | AttributeType::Binary
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(AttributeType::String),
            "N" => Ok(AttributeType::Number),
            "B" => Ok(AttributeType::Binary),
            "BOOL" => Ok(AttributeType::Bool),
            "SS" => Ok(AttributeType::StringSet),
            "NS" => Ok(AttributeType::NumberSet),
            "BS" => Ok(AttributeType::BinarySet),
            "L" => Ok(AttributeType::List),
            "M" => Ok(AttributeType::Map),
            "NULL" => Ok(AttributeType::Null),
            _ => Err(format!(
                "unknown attribute type `{}` \
                 (expected one of S, N, B, BOOL, SS, NS, BS, L, M, NULL)",
                s
            )),
        }
    }
}

impl TryFrom<String> for AttributeType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        value.code().to_string()
    }
}

/// Declared key schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeySchema {
    /// HASH key attribute
    #[serde(alias = "hash_key")]
    pub partition_key: String,

    /// RANGE key attribute
    #[serde(default, alias = "range_key")]
    pub sort_key: Option<String>,
}

/// User-declared table: the intent the generated code should express
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    /// Table name
    pub name: String,

    /// Declared attributes in input order
    pub attributes: IndexMap<String, AttributeType>,

    /// Declared key schema (if any)
    pub key_schema: Option<KeySchema>,
}

/// Normalized input: declared tables keyed by name, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputSchema {
    pub tables: IndexMap<String, TableSpec>,
}

impl InputSchema {
    /// Ordered names of every declared table
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Get a declared table by name
    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A key attribute with its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyAttribute {
    pub name: String,
    pub attr_type: AttributeType,
}

/// Whether an index is global or local
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Global,
    Local,
}

/// Secondary index on a resolved table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryIndex {
    pub name: String,
    pub kind: IndexKind,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

/// One attribute of a resolved table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeMetadata {
    /// Attribute name
    pub name: String,

    /// Attribute type (live type for key attributes)
    pub attr_type: AttributeType,

    /// Whether the attribute is part of the table's primary key
    pub is_key: bool,

    /// Whether the attribute was only found in live metadata
    pub from_live: bool,
}

/// Resolved table: declared attributes refined by live metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,

    /// Attributes, keys first, then declared order
    pub attributes: Vec<AttributeMetadata>,

    /// Partition (HASH) key
    pub partition_key: KeyAttribute,

    /// Sort (RANGE) key (if any)
    pub sort_key: Option<KeyAttribute>,

    /// Global and local secondary indexes
    pub indexes: Vec<SecondaryIndex>,
}

impl TableMetadata {
    /// Get an attribute by name
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeMetadata> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check if an attribute is part of the primary key
    pub fn is_key_attribute(&self, name: &str) -> bool {
        self.partition_key.name == name
            || self.sort_key.as_ref().is_some_and(|k| k.name == name)
    }

    /// Check if the table has a composite (partition + sort) key
    pub fn has_composite_key(&self) -> bool {
        self.sort_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_type_codes() {
        for code in ["S", "N", "B", "BOOL", "SS", "NS", "BS", "L", "M", "NULL"] {
            let parsed: AttributeType = code.parse().unwrap();
            assert_eq!(parsed.code(), code);
        }
        assert_eq!("bool".parse::<AttributeType>(), Ok(AttributeType::Bool));
        assert!("STRING".parse::<AttributeType>().is_err());
    }

    #[test]
    fn test_key_types() {
        assert!(AttributeType::String.is_key_type());
        assert!(AttributeType::Binary.is_key_type());
        assert!(!AttributeType::Bool.is_key_type());
        assert!(!AttributeType::Map.is_key_type());
    }

    #[test]
    fn test_attribute_type_serializes_as_code() {
        let json = serde_json::to_string(&AttributeType::StringSet).unwrap();
        assert_eq!(json, "\"SS\"");
    }
}
