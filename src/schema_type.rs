//! JSON Schema `type` sets and the built-in primitive table

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of JSON Schema primitive types.
///
/// The empty set means "any" (no `type` keyword is emitted). Members serialize
/// in a fixed canonical order so that unions such as `["string","null"]` are
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SchemaType(u8);

impl SchemaType {
    pub const ANY: SchemaType = SchemaType(0);
    pub const STRING: SchemaType = SchemaType(1);
    pub const INTEGER: SchemaType = SchemaType(1 << 1);
    pub const NUMBER: SchemaType = SchemaType(1 << 2);
    pub const BOOLEAN: SchemaType = SchemaType(1 << 3);
    pub const ARRAY: SchemaType = SchemaType(1 << 4);
    pub const OBJECT: SchemaType = SchemaType(1 << 5);
    pub const NULL: SchemaType = SchemaType(1 << 6);

    /// Canonical serialization order
    const ORDERED: [(SchemaType, &'static str); 7] = [
        (SchemaType::STRING, "string"),
        (SchemaType::INTEGER, "integer"),
        (SchemaType::NUMBER, "number"),
        (SchemaType::BOOLEAN, "boolean"),
        (SchemaType::ARRAY, "array"),
        (SchemaType::OBJECT, "object"),
        (SchemaType::NULL, "null"),
    ];

    pub fn is_any(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: SchemaType) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Type names in canonical order
    pub fn names(&self) -> Vec<&'static str> {
        Self::ORDERED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Parse a single JSON Schema type name
    pub fn from_name(name: &str) -> Option<SchemaType> {
        Self::ORDERED
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
    }

    /// Render as the value of a `type` keyword: `None` for any, a string for
    /// a single type, an array for a union.
    pub fn to_json(&self) -> Option<Value> {
        let names = self.names();
        match names.as_slice() {
            [] => None,
            [single] => Some(Value::String((*single).to_string())),
            many => Some(Value::Array(
                many.iter().map(|n| Value::String((*n).to_string())).collect(),
            )),
        }
    }
}

impl BitOr for SchemaType {
    type Output = SchemaType;

    fn bitor(self, rhs: SchemaType) -> SchemaType {
        SchemaType(self.0 | rhs.0)
    }
}

impl BitOrAssign for SchemaType {
    fn bitor_assign(&mut self, rhs: SchemaType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            write!(f, "any")
        } else {
            write!(f, "{}", self.names().join("|"))
        }
    }
}

/// Well-known scalar types with a fixed schema representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Float16,
    Float32,
    Float64,
    Decimal,
    Char,
    String,
    /// Binary payloads, written as base64 strings
    Bytes,
    DateTime,
    DateTimeOffset,
    Date,
    Time,
    Duration,
    Uuid,
    Uri,
    Version,
    /// Untyped value (the root object type)
    Object,
    /// Generic JSON value container
    JsonValue,
    JsonObject,
    JsonArray,
}

/// Schema representation of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveSchema {
    pub schema_type: SchemaType,
    pub format: Option<&'static str>,
}

const fn entry(
    primitive: PrimitiveType,
    schema_type: SchemaType,
    format: Option<&'static str>,
) -> (PrimitiveType, PrimitiveSchema) {
    (primitive, PrimitiveSchema { schema_type, format })
}

/// The built-in primitive table
static PRIMITIVE_TABLE: [(PrimitiveType, PrimitiveSchema); 30] = [
    entry(PrimitiveType::Boolean, SchemaType::BOOLEAN, None),
    entry(PrimitiveType::Int8, SchemaType::INTEGER, None),
    entry(PrimitiveType::Int16, SchemaType::INTEGER, None),
    entry(PrimitiveType::Int32, SchemaType::INTEGER, None),
    entry(PrimitiveType::Int64, SchemaType::INTEGER, None),
    entry(PrimitiveType::Int128, SchemaType::INTEGER, None),
    entry(PrimitiveType::UInt8, SchemaType::INTEGER, None),
    entry(PrimitiveType::UInt16, SchemaType::INTEGER, None),
    entry(PrimitiveType::UInt32, SchemaType::INTEGER, None),
    entry(PrimitiveType::UInt64, SchemaType::INTEGER, None),
    entry(PrimitiveType::UInt128, SchemaType::INTEGER, None),
    entry(PrimitiveType::Float16, SchemaType::NUMBER, None),
    entry(PrimitiveType::Float32, SchemaType::NUMBER, None),
    entry(PrimitiveType::Float64, SchemaType::NUMBER, None),
    entry(PrimitiveType::Decimal, SchemaType::NUMBER, None),
    entry(PrimitiveType::Char, SchemaType::STRING, None),
    entry(PrimitiveType::String, SchemaType::STRING, None),
    entry(PrimitiveType::Bytes, SchemaType::STRING, None),
    entry(PrimitiveType::DateTime, SchemaType::STRING, Some("date-time")),
    entry(PrimitiveType::DateTimeOffset, SchemaType::STRING, Some("date-time")),
    entry(PrimitiveType::Date, SchemaType::STRING, Some("date")),
    entry(PrimitiveType::Time, SchemaType::STRING, Some("time")),
    entry(PrimitiveType::Duration, SchemaType::STRING, Some("time")),
    entry(PrimitiveType::Uuid, SchemaType::STRING, Some("uuid")),
    entry(PrimitiveType::Uri, SchemaType::STRING, Some("uri")),
    entry(PrimitiveType::Version, SchemaType::STRING, None),
    entry(PrimitiveType::Object, SchemaType::ANY, None),
    entry(PrimitiveType::JsonValue, SchemaType::ANY, None),
    entry(PrimitiveType::JsonObject, SchemaType::OBJECT, None),
    entry(PrimitiveType::JsonArray, SchemaType::ARRAY, None),
];

impl PrimitiveType {
    /// Every primitive in table order
    pub fn all() -> impl Iterator<Item = PrimitiveType> {
        PRIMITIVE_TABLE.iter().map(|(p, _)| *p)
    }

    /// Look up the schema representation of this primitive
    pub fn schema(&self) -> PrimitiveSchema {
        PRIMITIVE_TABLE
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, s)| *s)
            .unwrap_or(PrimitiveSchema { schema_type: SchemaType::ANY, format: None })
    }

    /// Canonical type name under which the registry publishes this primitive
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Int8 => "i8",
            PrimitiveType::Int16 => "i16",
            PrimitiveType::Int32 => "i32",
            PrimitiveType::Int64 => "i64",
            PrimitiveType::Int128 => "i128",
            PrimitiveType::UInt8 => "u8",
            PrimitiveType::UInt16 => "u16",
            PrimitiveType::UInt32 => "u32",
            PrimitiveType::UInt64 => "u64",
            PrimitiveType::UInt128 => "u128",
            PrimitiveType::Float16 => "f16",
            PrimitiveType::Float32 => "f32",
            PrimitiveType::Float64 => "f64",
            PrimitiveType::Decimal => "Decimal",
            PrimitiveType::Char => "char",
            PrimitiveType::String => "String",
            PrimitiveType::Bytes => "Bytes",
            PrimitiveType::DateTime => "DateTime",
            PrimitiveType::DateTimeOffset => "DateTimeOffset",
            PrimitiveType::Date => "Date",
            PrimitiveType::Time => "Time",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::Uuid => "Uuid",
            PrimitiveType::Uri => "Uri",
            PrimitiveType::Version => "Version",
            PrimitiveType::Object => "Object",
            PrimitiveType::JsonValue => "JsonValue",
            PrimitiveType::JsonObject => "JsonObject",
            PrimitiveType::JsonArray => "JsonArray",
        }
    }

    /// Whether values of this primitive can never be null on the wire
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            PrimitiveType::String
                | PrimitiveType::Bytes
                | PrimitiveType::Uri
                | PrimitiveType::Version
                | PrimitiveType::Object
                | PrimitiveType::JsonValue
                | PrimitiveType::JsonObject
                | PrimitiveType::JsonArray
        )
    }
}
