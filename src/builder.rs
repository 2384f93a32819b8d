//! Schema node assembly
//!
//! Turns the fields computed for one contract node into an ordered JSON
//! object. Keywords are always emitted in the same order and absent or empty
//! fields are left out rather than written as `null`.

use serde_json::{Map, Value};

use crate::schema_type::SchemaType;

/// One JSON Schema object in the output tree
pub type SchemaNode = Map<String, Value>;

pub const SCHEMA_KEYWORD: &str = "$schema";
pub const REF_KEYWORD: &str = "$ref";
pub const TITLE_KEYWORD: &str = "title";
pub const DESCRIPTION_KEYWORD: &str = "description";
pub const TYPE_KEYWORD: &str = "type";
pub const FORMAT_KEYWORD: &str = "format";
pub const PROPERTIES_KEYWORD: &str = "properties";
pub const REQUIRED_KEYWORD: &str = "required";
pub const ITEMS_KEYWORD: &str = "items";
pub const ADDITIONAL_PROPERTIES_KEYWORD: &str = "additionalProperties";
pub const ENUM_KEYWORD: &str = "enum";
pub const CONST_KEYWORD: &str = "const";
pub const ANY_OF_KEYWORD: &str = "anyOf";
pub const DEFAULT_KEYWORD: &str = "default";

/// Computed fields of a schema node
#[derive(Debug, Clone, Default)]
pub struct SchemaFields {
    /// Dialect URI, set on the root node only
    pub schema_version: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub schema_type: SchemaType,
    pub format: Option<String>,
    pub properties: SchemaNode,
    pub required: Vec<String>,
    pub items: Option<SchemaNode>,
    /// `false` or a value schema
    pub additional_properties: Option<Value>,
    pub enum_values: Vec<Value>,
    pub const_value: Option<Value>,
    pub any_of: Vec<Value>,
}

impl SchemaFields {
    pub fn with_type(schema_type: SchemaType) -> Self {
        Self { schema_type, ..Default::default() }
    }

    /// Assemble the ordered node
    pub fn build(self) -> SchemaNode {
        let mut node = SchemaNode::new();

        if let Some(version) = self.schema_version {
            node.insert(SCHEMA_KEYWORD.to_string(), Value::String(version));
        }
        if let Some(title) = self.title {
            node.insert(TITLE_KEYWORD.to_string(), Value::String(title));
        }
        if let Some(description) = self.description {
            node.insert(DESCRIPTION_KEYWORD.to_string(), Value::String(description));
        }
        if let Some(ty) = self.schema_type.to_json() {
            node.insert(TYPE_KEYWORD.to_string(), ty);
        }
        if let Some(format) = self.format {
            node.insert(FORMAT_KEYWORD.to_string(), Value::String(format));
        }
        if !self.properties.is_empty() {
            node.insert(PROPERTIES_KEYWORD.to_string(), Value::Object(self.properties));
        }
        if !self.required.is_empty() {
            let required = self.required.into_iter().map(Value::String).collect();
            node.insert(REQUIRED_KEYWORD.to_string(), Value::Array(required));
        }
        if let Some(items) = self.items {
            node.insert(ITEMS_KEYWORD.to_string(), Value::Object(items));
        }
        if let Some(additional) = self.additional_properties {
            node.insert(ADDITIONAL_PROPERTIES_KEYWORD.to_string(), additional);
        }
        if !self.enum_values.is_empty() {
            node.insert(ENUM_KEYWORD.to_string(), Value::Array(self.enum_values));
        }
        if let Some(value) = self.const_value {
            node.insert(CONST_KEYWORD.to_string(), value);
        }
        if !self.any_of.is_empty() {
            node.insert(ANY_OF_KEYWORD.to_string(), Value::Array(self.any_of));
        }

        node
    }
}

/// `{"$ref": pointer}`
pub fn reference(pointer: &str) -> SchemaNode {
    let mut node = SchemaNode::new();
    node.insert(REF_KEYWORD.to_string(), Value::String(pointer.to_string()));
    node
}

/// `{"const": value}`
pub fn constant(value: Value) -> SchemaNode {
    SchemaFields { const_value: Some(value), ..Default::default() }.build()
}
