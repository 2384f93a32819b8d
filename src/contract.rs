//! Serialization contracts
//!
//! A [`Contract`] describes how one type is written to and read from JSON: its
//! shape, its properties, and the encoding strategy (converter) in effect.
//! Contracts are produced by a [`ContractProvider`](crate::provider::ContractProvider)
//! and are never mutated by the mapper. Nested types (elements, property
//! values, derived variants) are referenced by [`TypeName`] and resolved on
//! demand, which keeps recursive type graphs representable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

use crate::error::{Result, SchemaError};
use crate::naming::NamingPolicy;
use crate::schema_type::PrimitiveType;

/// Identity of a type known to a contract provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<PrimitiveType> for TypeName {
    fn from(p: PrimitiveType) -> Self {
        Self(p.type_name().to_string())
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Encoding strategy identity.
///
/// Two contracts with equal type and converter are interchangeable for
/// reference purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Converter {
    /// The serializer's standard strategy for the contract kind
    Default,
    /// Enums written as member names
    StringEnum { naming_policy: Option<NamingPolicy> },
    /// Enums written as their numeric values
    NumberEnum,
    /// Nullable wrapper around an element converter
    Nullable(Box<Converter>),
    /// User-supplied converter whose output shape is opaque
    Custom(String),
}

impl Converter {
    /// Whether the mapper can reason about the JSON this converter produces
    pub fn is_built_in(&self) -> bool {
        !matches!(self, Converter::Custom(_))
    }

    /// The element converter wrapped by a nullable converter
    pub fn nullable_element(&self) -> Option<&Converter> {
        match self {
            Converter::Nullable(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Numeric representation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NumberHandling(u8);

impl NumberHandling {
    pub const STRICT: NumberHandling = NumberHandling(0);
    pub const ALLOW_READING_FROM_STRING: NumberHandling = NumberHandling(1);
    pub const WRITE_AS_STRING: NumberHandling = NumberHandling(1 << 1);
    pub const ALLOW_NAMED_FLOATING_POINT_LITERALS: NumberHandling = NumberHandling(1 << 2);

    pub fn contains(&self, other: NumberHandling) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn union(self, other: NumberHandling) -> NumberHandling {
        NumberHandling(self.0 | other.0)
    }

    /// Numbers may appear as JSON strings
    pub fn allows_strings(&self) -> bool {
        self.contains(Self::ALLOW_READING_FROM_STRING) || self.contains(Self::WRITE_AS_STRING)
    }
}

/// Nullability annotation on a property or parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    /// No annotation available
    #[default]
    Oblivious,
    Nullable,
    NonNullable,
}

/// One declared member of an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumContract {
    /// Members in declaration order
    pub members: Vec<EnumMember>,
    /// Combinable bit-flag set
    pub is_flags: bool,
}

impl EnumContract {
    /// Members numbered 0, 1, 2, ... in declaration order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| EnumMember { name: name.into(), value: i as i64 })
            .collect();
        Self { members, is_flags: false }
    }

    /// Members with explicit values
    pub fn from_values<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let members = members
            .into_iter()
            .map(|(name, value)| EnumMember { name: name.into(), value })
            .collect();
        Self { members, is_flags: false }
    }

    pub fn flags(mut self) -> Self {
        self.is_flags = true;
        self
    }
}

/// Scalar (leaf) contracts
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarContract {
    Primitive(PrimitiveType),
    Enum(EnumContract),
    /// A scalar the mapper has no table entry for
    Opaque,
}

/// Object contract body
#[derive(Debug, Clone, Default)]
pub struct ObjectContract {
    /// Properties in serialization order
    pub properties: Vec<PropertyContract>,
    pub disallow_unmapped_members: bool,
    pub constructors: Vec<ConstructorContract>,
}

/// Contract shape
#[derive(Debug, Clone)]
pub enum ContractKind {
    Scalar(ScalarContract),
    Object(ObjectContract),
    Array { element: TypeName },
    Dictionary { value: TypeName },
    Nullable { element: TypeName },
}

/// A constructor the serializer may bind properties to
#[derive(Debug, Clone, Default)]
pub struct ConstructorContract {
    pub parameters: Vec<ParameterContract>,
    /// Explicitly marked as the deserialization constructor
    pub is_annotated: bool,
    pub is_public: bool,
}

impl ConstructorContract {
    pub fn new(parameters: Vec<ParameterContract>) -> Self {
        Self { parameters, is_annotated: false, is_public: true }
    }

    pub fn annotated(mut self) -> Self {
        self.is_annotated = true;
        self
    }

    pub fn non_public(mut self) -> Self {
        self.is_public = false;
        self
    }
}

/// A constructor or callable parameter
#[derive(Debug, Clone)]
pub struct ParameterContract {
    pub name: String,
    pub type_name: TypeName,
    /// Default value as it would be serialized; `Some(Value::Null)` for a null default
    pub default_value: Option<Value>,
    pub nullability: Nullability,
    pub description: Option<String>,
}

impl ParameterContract {
    pub fn new(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default_value: None,
            nullability: Nullability::Oblivious,
            description: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullability = Nullability::Nullable;
        self
    }

    pub fn non_nullable(mut self) -> Self {
        self.nullability = Nullability::NonNullable;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_optional(&self) -> bool {
        self.default_value.is_some()
    }
}

/// One serialized property of an object contract
#[derive(Debug, Clone)]
pub struct PropertyContract {
    /// JSON name (after the naming policy)
    pub name: String,
    /// Declared member name
    pub member_name: String,
    pub type_name: TypeName,
    pub is_required: bool,
    pub is_extension_data: bool,
    pub is_ignored: bool,
    pub has_explicit_name: bool,
    pub converter: Option<Converter>,
    pub number_handling: Option<NumberHandling>,
    pub description: Option<String>,
    pub nullability: Nullability,
    pub default_value: Option<Value>,
}

impl PropertyContract {
    pub fn new(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        let name = name.into();
        Self {
            member_name: name.clone(),
            name,
            type_name: type_name.into(),
            is_required: false,
            is_extension_data: false,
            is_ignored: false,
            has_explicit_name: false,
            converter: None,
            number_handling: None,
            description: None,
            nullability: Nullability::Oblivious,
            default_value: None,
        }
    }

    /// Serialize under an explicit JSON name, exempt from naming policies
    pub fn renamed(mut self, json_name: impl Into<String>) -> Self {
        self.name = json_name.into();
        self.has_explicit_name = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.is_ignored = true;
        self
    }

    pub fn extension_data(mut self) -> Self {
        self.is_extension_data = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullability = Nullability::Nullable;
        self
    }

    pub fn non_nullable(mut self) -> Self {
        self.nullability = Nullability::NonNullable;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_number_handling(mut self, handling: NumberHandling) -> Self {
        self.number_handling = Some(handling);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Value of a polymorphic type discriminator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discriminator {
    String(String),
    Integer(i64),
}

impl Discriminator {
    pub fn to_json(&self) -> Value {
        match self {
            Discriminator::String(s) => Value::String(s.clone()),
            Discriminator::Integer(i) => Value::from(*i),
        }
    }
}

impl From<&str> for Discriminator {
    fn from(s: &str) -> Self {
        Discriminator::String(s.to_string())
    }
}

impl From<i64> for Discriminator {
    fn from(i: i64) -> Self {
        Discriminator::Integer(i)
    }
}

/// A derived type a polymorphic base may serialize as
#[derive(Debug, Clone)]
pub struct DerivedVariant {
    pub discriminator: Option<Discriminator>,
    pub type_name: TypeName,
}

/// Polymorphic serialization settings of a base type
#[derive(Debug, Clone)]
pub struct Polymorphism {
    /// Name of the injected discriminator property
    pub discriminator_property: String,
    /// Variants in declaration order
    pub variants: Vec<DerivedVariant>,
}

impl Default for Polymorphism {
    fn default() -> Self {
        Self {
            discriminator_property: "$type".to_string(),
            variants: Vec::new(),
        }
    }
}

impl Polymorphism {
    pub fn variant(mut self, type_name: impl Into<TypeName>, discriminator: Option<Discriminator>) -> Self {
        self.variants.push(DerivedVariant { discriminator, type_name: type_name.into() });
        self
    }
}

/// Immutable description of one type's JSON shape
#[derive(Debug, Clone)]
pub struct Contract {
    pub type_name: TypeName,
    pub kind: ContractKind,
    pub converter: Converter,
    pub number_handling: Option<NumberHandling>,
    /// Values of the type can never be null (structs, numbers, ...)
    pub is_value_type: bool,
    pub description: Option<String>,
    pub polymorphism: Option<Polymorphism>,
}

impl Contract {
    pub fn new(type_name: impl Into<TypeName>, kind: ContractKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            converter: Converter::Default,
            number_handling: None,
            is_value_type: false,
            description: None,
            polymorphism: None,
        }
    }

    /// Contract of a built-in primitive, published under its canonical name
    pub fn primitive(primitive: PrimitiveType) -> Self {
        let mut contract = Self::new(primitive, ContractKind::Scalar(ScalarContract::Primitive(primitive)));
        contract.is_value_type = primitive.is_value_type();
        contract
    }

    /// Enum contract, written as numbers unless a string converter is set
    pub fn enumeration(type_name: impl Into<TypeName>, declaration: EnumContract) -> Self {
        Self::new(type_name, ContractKind::Scalar(ScalarContract::Enum(declaration))).value_type()
    }

    /// Scalar with no known representation
    pub fn opaque(type_name: impl Into<TypeName>) -> Self {
        Self::new(type_name, ContractKind::Scalar(ScalarContract::Opaque))
    }

    pub fn object(type_name: impl Into<TypeName>, properties: Vec<PropertyContract>) -> Self {
        Self::new(
            type_name,
            ContractKind::Object(ObjectContract { properties, ..Default::default() }),
        )
    }

    pub fn array(type_name: impl Into<TypeName>, element: impl Into<TypeName>) -> Self {
        Self::new(type_name, ContractKind::Array { element: element.into() })
    }

    pub fn dictionary(type_name: impl Into<TypeName>, value: impl Into<TypeName>) -> Self {
        Self::new(type_name, ContractKind::Dictionary { value: value.into() })
    }

    /// Nullable wrapper `Option<T>` around `element`
    pub fn nullable(type_name: impl Into<TypeName>, element: impl Into<TypeName>) -> Self {
        let mut contract = Self::new(type_name, ContractKind::Nullable { element: element.into() });
        contract.is_value_type = true;
        contract
    }

    pub fn value_type(mut self) -> Self {
        self.is_value_type = true;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_number_handling(mut self, handling: NumberHandling) -> Self {
        self.number_handling = Some(handling);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_polymorphism(mut self, polymorphism: Polymorphism) -> Self {
        self.polymorphism = Some(polymorphism);
        self
    }

    /// Reject members that are not mapped to a property (object contracts only)
    pub fn disallow_unmapped_members(mut self) -> Self {
        if let ContractKind::Object(object) = &mut self.kind {
            object.disallow_unmapped_members = true;
        }
        self
    }

    /// Add a constructor (object contracts only)
    pub fn with_constructor(mut self, constructor: ConstructorContract) -> Self {
        if let ContractKind::Object(object) = &mut self.kind {
            object.constructors.push(constructor);
        }
        self
    }

    /// Every type name this contract refers to
    pub fn referenced_types(&self) -> Vec<&TypeName> {
        let mut types = Vec::new();
        match &self.kind {
            ContractKind::Scalar(_) => {}
            ContractKind::Object(object) => {
                types.extend(object.properties.iter().map(|p| &p.type_name));
                for ctor in &object.constructors {
                    types.extend(ctor.parameters.iter().map(|p| &p.type_name));
                }
            }
            ContractKind::Array { element } | ContractKind::Nullable { element } => types.push(element),
            ContractKind::Dictionary { value } => types.push(value),
        }
        if let Some(poly) = &self.polymorphism {
            types.extend(poly.variants.iter().map(|v| &v.type_name));
        }
        types
    }

    /// Select the constructor used for deserialization.
    ///
    /// The unique annotated constructor wins; otherwise value types use their
    /// implicit default constructor, and reference types fall back to the
    /// public parameterless constructor or the lone public constructor.
    pub fn deserialization_constructor(&self) -> Result<Option<&ConstructorContract>> {
        let ContractKind::Object(object) = &self.kind else {
            return Ok(None);
        };

        let mut annotated = object.constructors.iter().filter(|c| c.is_annotated);
        let first_annotated = annotated.next();
        if annotated.next().is_some() {
            return Err(SchemaError::Configuration(format!(
                "type '{}' has more than one constructor marked as the deserialization constructor",
                self.type_name
            )));
        }
        if let Some(ctor) = first_annotated {
            return Ok(Some(ctor));
        }

        if self.is_value_type {
            return Ok(None);
        }

        let public: Vec<_> = object.constructors.iter().filter(|c| c.is_public).collect();
        let parameterless = public.iter().find(|c| c.parameters.is_empty()).copied();
        let lone = if public.len() == 1 { Some(public[0]) } else { None };
        Ok(parameterless.or(lone))
    }
}
