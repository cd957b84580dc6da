//! DynamoDB to Rust type mapping

use crate::parser::{AttributeMetadata, AttributeType, KeyAttribute};

/// Represents a Rust type for code generation
#[derive(Debug, Clone, PartialEq)]
pub enum RustType {
    Bool,
    F64,
    String,
    Bytes,
    StringSet,
    NumberSet,
    BinarySet,
    JsonList,
    JsonMap,
    Unit,
    /// Optional wrapper
    Option(Box<RustType>),
}

impl RustType {
    /// Get the type string for code generation
    pub fn to_type_string(&self) -> String {
        match self {
            RustType::Bool => "bool".to_string(),
            RustType::F64 => "f64".to_string(),
            RustType::String => "String".to_string(),
            RustType::Bytes => "serde_bytes::ByteBuf".to_string(),
            RustType::StringSet => "std::collections::HashSet<String>".to_string(),
            RustType::NumberSet => "Vec<f64>".to_string(),
            RustType::BinarySet => "Vec<serde_bytes::ByteBuf>".to_string(),
            RustType::JsonList => "Vec<serde_json::Value>".to_string(),
            RustType::JsonMap => {
                "std::collections::HashMap<String, serde_json::Value>".to_string()
            }
            RustType::Unit => "()".to_string(),
            RustType::Option(inner) => format!("Option<{}>", inner.to_type_string()),
        }
    }

    /// Check if this is an Option type
    pub fn is_optional(&self) -> bool {
        matches!(self, RustType::Option(_))
    }

    /// serde_dynamo module that writes this type as a DynamoDB set.
    ///
    /// Without it sequences are written as `L` lists.
    pub fn set_module(&self) -> Option<&'static str> {
        match self {
            RustType::StringSet => Some("serde_dynamo::string_set"),
            RustType::NumberSet => Some("serde_dynamo::number_set"),
            RustType::BinarySet => Some("serde_dynamo::binary_set"),
            _ => None,
        }
    }

    /// Path of the emptiness check used by `skip_serializing_if`
    fn empty_check(&self) -> &'static str {
        match self {
            RustType::StringSet => "std::collections::HashSet::is_empty",
            RustType::Option(_) => "Option::is_none",
            _ => "Vec::is_empty",
        }
    }
}

/// How a key attribute is passed to and encoded by generated CRUD functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParam {
    /// Parameter type, e.g. `&str`
    pub param_type: &'static str,
    /// Expression template producing an `AttributeValue`; `{}` is the parameter
    pub attribute_value: &'static str,
}

/// Resolve DynamoDB attribute types to Rust types
pub struct TypeResolver;

impl TypeResolver {
    /// Get the Rust type for a resolved attribute.
    ///
    /// Key attributes are always present on an item. Sets default to empty,
    /// since DynamoDB cannot store an empty set. Every other attribute may be
    /// missing and is wrapped in `Option`.
    pub fn resolve(attribute: &AttributeMetadata) -> RustType {
        let base_type = Self::resolve_base_type(attribute.attr_type);
        if attribute.is_key || base_type.set_module().is_some() {
            base_type
        } else {
            RustType::Option(Box::new(base_type))
        }
    }

    /// Arguments of the field's `#[serde(..)]` attribute, if it needs one
    pub fn serde_attribute(attribute: &AttributeMetadata) -> Option<String> {
        if attribute.is_key {
            return None;
        }
        let rust_type = Self::resolve(attribute);
        let skip = format!("skip_serializing_if = \"{}\"", rust_type.empty_check());
        Some(match rust_type.set_module() {
            Some(module) => format!("default, with = \"{}\", {}", module, skip),
            None => format!("default, {}", skip),
        })
    }

    /// Resolve the base type (without Option wrapper)
    pub fn resolve_base_type(attr_type: AttributeType) -> RustType {
        match attr_type {
            AttributeType::String => RustType::String,
            AttributeType::Number => RustType::F64,
            AttributeType::Binary => RustType::Bytes,
            AttributeType::Bool => RustType::Bool,
            AttributeType::StringSet => RustType::StringSet,
            AttributeType::NumberSet => RustType::NumberSet,
            AttributeType::BinarySet => RustType::BinarySet,
            AttributeType::List => RustType::JsonList,
            AttributeType::Map => RustType::JsonMap,
            AttributeType::Null => RustType::Unit,
        }
    }

    /// Parameter type and `AttributeValue` constructor for a key attribute
    pub fn key_param(key: &KeyAttribute) -> KeyParam {
        match key.attr_type {
            AttributeType::Number => KeyParam {
                param_type: "f64",
                attribute_value: "AttributeValue::N({}.to_string())",
            },
            AttributeType::Binary => KeyParam {
                param_type: "&[u8]",
                attribute_value: "AttributeValue::B(Blob::new({}))",
            },
            // Reconciliation only admits S, N and B as key types
            _ => KeyParam {
                param_type: "&str",
                attribute_value: "AttributeValue::S({}.to_string())",
            },
        }
    }
}

impl KeyParam {
    /// Expression encoding the variable `var`
    pub fn encode(&self, var: &str) -> String {
        self.attribute_value.replace("{}", var)
    }
}
