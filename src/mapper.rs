//! Contract to JSON Schema mapping
//!
//! [`ContractMapper`] walks a contract graph depth first and produces one
//! schema node per contract occurrence. Composite contracts are registered in
//! the [`GenerationState`] before their children are mapped, so a second
//! occurrence of the same type and converter (including a cyclic back edge)
//! becomes a `$ref` to the first one.

use serde_json::Value;

use crate::builder::{self, SchemaFields, SchemaNode, ANY_OF_KEYWORD, DEFAULT_KEYWORD, ENUM_KEYWORD, TYPE_KEYWORD};
use crate::config::ReferenceNullability;
use crate::contract::{
    Contract, ContractKind, Converter, EnumContract, Nullability, NumberHandling, ObjectContract,
    Polymorphism, ScalarContract,
};
use crate::error::{Result, SchemaError};
use crate::provider::ContractProvider;
use crate::schema_type::{PrimitiveType, SchemaType};
use crate::state::{GenerationState, VisitKey};
use crate::SCHEMA_VERSION;

const VALUES_PROPERTY: &str = "$values";
const NAMED_FLOAT_LITERALS: [&str; 3] = ["NaN", "Infinity", "-Infinity"];

/// Overrides supplied by the occurrence of a contract (a property, an
/// element, a parameter) rather than by the contract itself
#[derive(Debug, Clone, Default)]
pub struct Site {
    pub title: Option<String>,
    pub description: Option<String>,
    pub converter: Option<Converter>,
    pub number_handling: Option<NumberHandling>,
    /// Union `null` into reference-typed schemas at this occurrence
    pub nullable: bool,
    pub default_value: Option<Value>,
}

impl Site {
    /// An occurrence with the given nullability annotation
    pub fn annotated(config_mode: ReferenceNullability, nullability: Nullability) -> Self {
        Self {
            nullable: admits_null(config_mode, nullability),
            ..Default::default()
        }
    }
}

/// Whether an occurrence with `nullability` unions `null` under `mode`
pub fn admits_null(mode: ReferenceNullability, nullability: Nullability) -> bool {
    match mode {
        ReferenceNullability::AlwaysNullable => true,
        ReferenceNullability::Annotated => nullability == Nullability::Nullable,
        ReferenceNullability::NeverNullable => false,
    }
}

/// Recursive contract mapper
pub struct ContractMapper<'p, P: ContractProvider + ?Sized> {
    provider: &'p P,
}

impl<'p, P: ContractProvider + ?Sized> ContractMapper<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self { provider }
    }

    /// Map one occurrence of `contract` at the current position of `state`
    pub fn map(&self, contract: &Contract, state: &mut GenerationState<'_>, mut site: Site) -> Result<SchemaNode> {
        let default_value = site.default_value.take();
        let mut node = self.map_contract(contract, state, site)?;
        if let Some(value) = default_value {
            node.insert(DEFAULT_KEYWORD.to_string(), value);
        }
        Ok(node)
    }

    fn map_contract(&self, contract: &Contract, state: &mut GenerationState<'_>, site: Site) -> Result<SchemaNode> {
        let converter = site.converter.clone().unwrap_or_else(|| contract.converter.clone());
        if !converter.is_built_in() {
            tracing::trace!(type_name = %contract.type_name, ?converter, "custom converter, emitting empty schema");
            return Ok(SchemaNode::new());
        }

        let key = visit_key(contract, &converter, site.nullable);
        if let Some(pointer) = state.lookup(&key) {
            tracing::trace!(type_name = %contract.type_name, pointer, "emitting schema reference");
            return Ok(builder::reference(pointer));
        }

        let config = state.config();
        let mut description = site.description;
        if config.resolve_descriptions && description.is_none() {
            description = contract.description.clone();
        }

        if let ContractKind::Nullable { element } = &contract.kind {
            let element = self.provider.resolve(element)?;
            let element_converter = site
                .converter
                .or_else(|| contract.converter.nullable_element().cloned())
                .map(|c| match c {
                    Converter::Nullable(inner) => *inner,
                    other => other,
                });
            let inner = Site {
                title: site.title,
                description,
                converter: element_converter,
                number_handling: site.number_handling,
                nullable: true,
                default_value: None,
            };
            let mut node = self.map_contract(&element, state, inner)?;
            let is_enum = matches!(element.kind, ContractKind::Scalar(ScalarContract::Enum(_)));
            append_null(&mut node, is_enum);
            return Ok(node);
        }

        let number_handling = site.number_handling.or(contract.number_handling);
        let register = (!contract.is_value_type).then_some(key);

        let mut fields = match contract.polymorphism.as_ref().filter(|p| !p.variants.is_empty()) {
            Some(polymorphism) => {
                if let Some(key) = register {
                    state.register(key);
                }
                let mut any_of = self.map_variants(contract, polymorphism, &converter, number_handling, state)?;
                if site.nullable && !contract.is_value_type {
                    any_of.push(null_branch());
                }
                SchemaFields { any_of, ..Default::default() }
            }
            None => self.map_shape(contract, &converter, number_handling, state, register)?,
        };

        if site.nullable && !fields.schema_type.is_any() && !contract.is_value_type {
            fields.schema_type |= SchemaType::NULL;
        }

        if state.depth() == 0 && config.include_schema_version {
            fields.schema_version = Some(SCHEMA_VERSION.to_string());
        }
        fields.title = site.title;
        fields.description = description;

        Ok(fields.build())
    }

    /// Fields for the structural shape of a contract, ignoring polymorphism
    fn map_shape(
        &self,
        contract: &Contract,
        converter: &Converter,
        number_handling: Option<NumberHandling>,
        state: &mut GenerationState<'_>,
        register: Option<VisitKey>,
    ) -> Result<SchemaFields> {
        let mode = state.config().reference_nullability;

        match &contract.kind {
            ContractKind::Scalar(ScalarContract::Primitive(primitive)) => {
                Ok(map_primitive(*primitive, number_handling))
            }
            ContractKind::Scalar(ScalarContract::Enum(declaration)) => Ok(map_enum(declaration, converter)),
            ContractKind::Scalar(ScalarContract::Opaque) => Ok(SchemaFields::default()),
            ContractKind::Object(object) => {
                if let Some(key) = register {
                    state.register(key);
                }
                self.map_object(contract, object, number_handling, state)
            }
            ContractKind::Array { element } => {
                if let Some(key) = register {
                    state.register(key);
                }
                let element = self.provider.resolve(element)?;
                let mut scope = state.push(builder::ITEMS_KEYWORD)?;
                let items = self.map(&element, &mut scope, Site::annotated(mode, Nullability::Oblivious))?;
                Ok(SchemaFields {
                    schema_type: SchemaType::ARRAY,
                    items: Some(items),
                    ..Default::default()
                })
            }
            ContractKind::Dictionary { value } => {
                if let Some(key) = register {
                    state.register(key);
                }
                let value = self.provider.resolve(value)?;
                let mut scope = state.push(builder::ADDITIONAL_PROPERTIES_KEYWORD)?;
                let values = self.map(&value, &mut scope, Site::annotated(mode, Nullability::Oblivious))?;
                Ok(SchemaFields {
                    schema_type: SchemaType::OBJECT,
                    additional_properties: Some(Value::Object(values)),
                    ..Default::default()
                })
            }
            ContractKind::Nullable { .. } => Err(SchemaError::Configuration(format!(
                "nullable wrapper '{}' cannot be mapped as a polymorphic variant",
                contract.type_name
            ))),
        }
    }

    fn map_object(
        &self,
        contract: &Contract,
        object: &ObjectContract,
        number_handling: Option<NumberHandling>,
        state: &mut GenerationState<'_>,
    ) -> Result<SchemaFields> {
        let config = state.config();
        let constructor = contract.deserialization_constructor()?;

        let mut fields = SchemaFields::with_type(SchemaType::OBJECT);
        let mut scope = state.push(builder::PROPERTIES_KEYWORD)?;

        for property in object.properties.iter().filter(|p| !p.is_ignored && !p.is_extension_data) {
            let parameter = constructor.and_then(|ctor| {
                ctor.parameters.iter().find(|param| {
                    param.name.eq_ignore_ascii_case(&property.member_name) && param.type_name == property.type_name
                })
            });

            let nullability = match (property.nullability, parameter) {
                (Nullability::Oblivious, Some(param)) => param.nullability,
                (nullability, _) => nullability,
            };
            let description = if config.resolve_descriptions {
                property
                    .description
                    .clone()
                    .or_else(|| parameter.and_then(|p| p.description.clone()))
            } else {
                None
            };
            let default_value = property
                .default_value
                .clone()
                .or_else(|| parameter.and_then(|p| p.default_value.clone()));
            let is_required = property.is_required || parameter.is_some_and(|p| !p.is_optional());

            let site = Site {
                title: None,
                description,
                converter: property.converter.clone(),
                number_handling: property.number_handling.or(number_handling),
                nullable: admits_null(config.reference_nullability, nullability),
                default_value,
            };

            let value = self.provider.resolve(&property.type_name)?;
            let node = {
                let mut property_scope = scope.push(property.name.as_str())?;
                self.map(&value, &mut property_scope, site)?
            };

            fields.properties.insert(property.name.clone(), Value::Object(node));
            if is_required {
                fields.required.push(property.name.clone());
            }
        }

        if object.disallow_unmapped_members {
            fields.additional_properties = Some(Value::Bool(false));
        }

        Ok(fields)
    }

    /// One `anyOf` branch for the base shape and one per derived variant
    fn map_variants(
        &self,
        contract: &Contract,
        polymorphism: &Polymorphism,
        converter: &Converter,
        number_handling: Option<NumberHandling>,
        state: &mut GenerationState<'_>,
    ) -> Result<Vec<Value>> {
        let mut scope = state.push(ANY_OF_KEYWORD)?;
        let mut branches = Vec::with_capacity(polymorphism.variants.len() + 1);

        {
            let mut branch = scope.push("0")?;
            let fields = self.map_shape(contract, converter, number_handling, &mut branch, None)?;
            branches.push(Value::Object(fields.build()));
        }

        let variants = polymorphism
            .variants
            .iter()
            .filter(|v| v.discriminator.is_some() || v.type_name != contract.type_name);

        for variant in variants {
            let mut branch = scope.push(branches.len().to_string())?;
            let derived = self.provider.resolve(&variant.type_name)?;
            let derived_converter = derived.converter.clone();
            let derived_handling = derived.number_handling.or(number_handling);

            let node = match &variant.discriminator {
                None => {
                    let key = visit_key(&derived, &derived_converter, false);
                    if let Some(pointer) = branch.lookup(&key) {
                        builder::reference(pointer)
                    } else {
                        let register = (!derived.is_value_type).then_some(key);
                        let mut fields =
                            self.map_shape(&derived, &derived_converter, derived_handling, &mut branch, register)?;
                        fields.description = self.description_of(&derived, &branch);
                        fields.build()
                    }
                }
                Some(discriminator) => {
                    let discriminator_schema = Value::Object(builder::constant(discriminator.to_json()));
                    let name = polymorphism.discriminator_property.clone();

                    let mut fields = match &derived.kind {
                        ContractKind::Object(_) | ContractKind::Dictionary { .. } => {
                            let mut fields =
                                self.map_shape(&derived, &derived_converter, derived_handling, &mut branch, None)?;
                            let mut properties = SchemaNode::new();
                            properties.insert(name.clone(), discriminator_schema);
                            properties.extend(std::mem::take(&mut fields.properties));
                            fields.properties = properties;
                            fields.required.insert(0, name);
                            fields
                        }
                        _ => {
                            let values = {
                                let mut properties = branch.push(builder::PROPERTIES_KEYWORD)?;
                                let mut values = properties.push(VALUES_PROPERTY)?;
                                self.map_shape(&derived, &derived_converter, derived_handling, &mut values, None)?
                                    .build()
                            };
                            let mut fields = SchemaFields::with_type(SchemaType::OBJECT);
                            fields.properties.insert(name.clone(), discriminator_schema);
                            fields.properties.insert(VALUES_PROPERTY.to_string(), Value::Object(values));
                            fields.required = vec![name, VALUES_PROPERTY.to_string()];
                            fields
                        }
                    };
                    fields.description = self.description_of(&derived, &branch);
                    fields.build()
                }
            };

            branches.push(Value::Object(node));
        }

        Ok(branches)
    }

    fn description_of(&self, contract: &Contract, state: &GenerationState<'_>) -> Option<String> {
        if state.config().resolve_descriptions {
            contract.description.clone()
        } else {
            None
        }
    }
}

/// Reference key of an occurrence. Value types never take the reference-type
/// `null` overlay, so their key is always non-nullable.
fn visit_key(contract: &Contract, converter: &Converter, nullable: bool) -> VisitKey {
    VisitKey {
        type_name: contract.type_name.clone(),
        converter: converter.clone(),
        nullable: nullable && !contract.is_value_type,
    }
}

fn null_branch() -> Value {
    let mut branch = SchemaNode::new();
    branch.insert(TYPE_KEYWORD.to_string(), Value::from("null"));
    Value::Object(branch)
}

fn map_primitive(primitive: PrimitiveType, number_handling: Option<NumberHandling>) -> SchemaFields {
    let schema = primitive.schema();
    let mut fields = SchemaFields::with_type(schema.schema_type);
    fields.format = schema.format.map(str::to_string);

    let numeric = schema.schema_type == SchemaType::INTEGER || schema.schema_type == SchemaType::NUMBER;
    match number_handling {
        Some(handling) if numeric && handling.allows_strings() => {
            fields.schema_type |= SchemaType::STRING;
        }
        Some(handling) if numeric && handling == NumberHandling::ALLOW_NAMED_FLOATING_POINT_LITERALS => {
            let mut numeric_branch = SchemaNode::new();
            if let Some(ty) = schema.schema_type.to_json() {
                numeric_branch.insert(TYPE_KEYWORD.to_string(), ty);
            }
            let mut literals_branch = SchemaNode::new();
            literals_branch.insert(
                ENUM_KEYWORD.to_string(),
                Value::Array(NAMED_FLOAT_LITERALS.iter().map(|l| Value::from(*l)).collect()),
            );
            fields.any_of = vec![Value::Object(numeric_branch), Value::Object(literals_branch)];
            fields.schema_type = SchemaType::ANY;
        }
        _ => {}
    }

    fields
}

fn map_enum(declaration: &EnumContract, converter: &Converter) -> SchemaFields {
    match converter {
        Converter::StringEnum { .. } if declaration.is_flags => SchemaFields::with_type(SchemaType::STRING),
        Converter::StringEnum { naming_policy } => SchemaFields {
            enum_values: declaration
                .members
                .iter()
                .map(|m| match naming_policy {
                    Some(policy) => Value::String(policy.convert(&m.name)),
                    None => Value::String(m.name.clone()),
                })
                .collect(),
            ..Default::default()
        },
        _ => SchemaFields::with_type(SchemaType::INTEGER),
    }
}

/// Widen an already built node so that it also accepts `null`
fn append_null(node: &mut SchemaNode, is_enum: bool) {
    if is_enum {
        if let Some(Value::Array(values)) = node.get_mut(ENUM_KEYWORD) {
            if !values.contains(&Value::Null) {
                values.push(Value::Null);
            }
            return;
        }
    }

    let null = Value::from("null");
    match node.get_mut(TYPE_KEYWORD) {
        Some(Value::Array(types)) => {
            if !types.contains(&null) {
                types.push(null);
            }
        }
        Some(ty @ Value::String(_)) => {
            if *ty != null {
                let single = ty.take();
                *ty = Value::Array(vec![single, null]);
            }
        }
        Some(_) => {}
        None => {
            if let Some(Value::Array(branches)) = node.get_mut(ANY_OF_KEYWORD) {
                let branch = null_branch();
                if !branches.contains(&branch) {
                    branches.push(branch);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::contract::PropertyContract;
    use crate::naming::NamingPolicy;
    use crate::provider::ContractRegistry;
    use serde_json::json;

    fn map_root(registry: &ContractRegistry, type_name: &str, config: &MapperConfig) -> Result<Value> {
        let contract = registry.resolve(&type_name.into())?;
        let mut state = GenerationState::new(config);
        let site = Site::annotated(config.reference_nullability, Nullability::Oblivious);
        Ok(Value::Object(ContractMapper::new(registry).map(&contract, &mut state, site)?))
    }

    fn bare() -> MapperConfig {
        MapperConfig::default().with_schema_version(false)
    }

    #[test]
    fn test_every_primitive_matches_table() {
        let registry = ContractRegistry::new();
        for primitive in PrimitiveType::all() {
            let schema = map_root(&registry, primitive.type_name(), &bare()).unwrap();
            let expected = primitive.schema();
            assert_eq!(schema.get("type").cloned(), expected.schema_type.to_json(), "{:?}", primitive);
            assert_eq!(schema.get("format").and_then(Value::as_str), expected.format, "{:?}", primitive);
        }
    }

    #[test]
    fn test_nullable_primitive_unions_null_once() {
        let mut registry = ContractRegistry::new();
        let inner = registry.register_nullable(PrimitiveType::Int32).unwrap();
        registry.register(Contract::nullable("Option<Option<i32>>", inner)).unwrap();

        let schema = map_root(&registry, "Option<i32>", &bare()).unwrap();
        assert_eq!(schema, json!({"type": ["integer", "null"]}));

        let twice = map_root(&registry, "Option<Option<i32>>", &bare()).unwrap();
        assert_eq!(twice, json!({"type": ["integer", "null"]}));
    }

    #[test]
    fn test_nullable_string_enum_appends_null_literal() {
        let mut registry = ContractRegistry::new();
        registry
            .register(
                Contract::enumeration("Color", EnumContract::from_names(["Red", "Green"]))
                    .with_converter(Converter::StringEnum { naming_policy: Some(NamingPolicy::CamelCase) }),
            )
            .unwrap();
        registry.register_nullable("Color").unwrap();

        let schema = map_root(&registry, "Option<Color>", &bare()).unwrap();
        assert_eq!(schema, json!({"enum": ["red", "green", null]}));
    }

    #[test]
    fn test_enum_encodings() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::enumeration("Numeric", EnumContract::from_names(["A", "B"])))
            .unwrap();
        let flags = EnumContract::from_values([("A", 1), ("B", 2), ("C", 4)]).flags();
        registry
            .register(
                Contract::enumeration("Flags", flags).with_converter(Converter::StringEnum { naming_policy: None }),
            )
            .unwrap();
        registry
            .register(
                Contract::enumeration("Level", EnumContract::from_values([("Low", 10), ("High", 20)]))
                    .with_converter(Converter::NumberEnum),
            )
            .unwrap();

        assert_eq!(map_root(&registry, "Numeric", &bare()).unwrap(), json!({"type": "integer"}));
        assert_eq!(map_root(&registry, "Flags", &bare()).unwrap(), json!({"type": "string"}));
        assert_eq!(map_root(&registry, "Level", &bare()).unwrap(), json!({"type": "integer"}));
    }

    #[test]
    fn test_number_handling_overlays() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object(
                "Numbers",
                vec![
                    PropertyContract::new("Lenient", PrimitiveType::Int32)
                        .with_number_handling(NumberHandling::ALLOW_READING_FROM_STRING),
                    PropertyContract::new("Literal", PrimitiveType::Float64)
                        .with_number_handling(NumberHandling::ALLOW_NAMED_FLOATING_POINT_LITERALS),
                    PropertyContract::new("Text", PrimitiveType::String)
                        .with_number_handling(NumberHandling::WRITE_AS_STRING),
                ],
            ))
            .unwrap();

        let schema = map_root(&registry, "Numbers", &bare()).unwrap();
        assert_eq!(schema["properties"]["Lenient"], json!({"type": ["string", "integer"]}));
        assert_eq!(
            schema["properties"]["Literal"],
            json!({"anyOf": [{"type": "number"}, {"enum": ["NaN", "Infinity", "-Infinity"]}]})
        );
        assert_eq!(schema["properties"]["Text"], json!({"type": "string"}));
    }

    #[test]
    fn test_nullable_named_literals_gain_null_branch() {
        let mut registry = ContractRegistry::new();
        registry.register_nullable(PrimitiveType::Float64).unwrap();
        registry
            .register(Contract::object(
                "Reading",
                vec![PropertyContract::new("Value", "Option<f64>")
                    .with_number_handling(NumberHandling::ALLOW_NAMED_FLOATING_POINT_LITERALS)],
            ))
            .unwrap();

        let schema = map_root(&registry, "Reading", &bare()).unwrap();
        assert_eq!(
            schema["properties"]["Value"],
            json!({"anyOf": [{"type": "number"}, {"enum": ["NaN", "Infinity", "-Infinity"]}, {"type": "null"}]})
        );
    }

    #[test]
    fn test_custom_converter_escapes_before_references() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object(
                "Node",
                vec![PropertyContract::new("Next", "Node").with_converter(Converter::Custom("NodeConverter".into()))],
            ))
            .unwrap();

        let schema = map_root(&registry, "Node", &bare()).unwrap();
        assert_eq!(schema, json!({"type": "object", "properties": {"Next": {}}}));
    }

    #[test]
    fn test_repeated_type_becomes_reference() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object("Point", vec![PropertyContract::new("X", PrimitiveType::Int32)]))
            .unwrap();
        registry
            .register(Contract::object(
                "Line",
                vec![PropertyContract::new("From", "Point"), PropertyContract::new("To", "Point")],
            ))
            .unwrap();

        let schema = map_root(&registry, "Line", &bare()).unwrap();
        assert_eq!(schema["properties"]["To"], json!({"$ref": "#/properties/From"}));
    }

    #[test]
    fn test_value_type_composites_are_not_referenced() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object("Point", vec![PropertyContract::new("X", PrimitiveType::Int32)]).value_type())
            .unwrap();
        registry
            .register(Contract::object(
                "Line",
                vec![PropertyContract::new("From", "Point"), PropertyContract::new("To", "Point")],
            ))
            .unwrap();

        let schema = map_root(&registry, "Line", &bare()).unwrap();
        assert_eq!(schema["properties"]["From"], schema["properties"]["To"]);
    }

    #[test]
    fn test_nullable_occurrence_does_not_reference_non_nullable() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object("Point", vec![PropertyContract::new("X", PrimitiveType::Int32)]))
            .unwrap();
        registry
            .register(Contract::object(
                "Line",
                vec![
                    PropertyContract::new("From", "Point"),
                    PropertyContract::new("To", "Point").nullable(),
                    PropertyContract::new("Via", "Point").nullable(),
                ],
            ))
            .unwrap();

        let schema = map_root(&registry, "Line", &bare()).unwrap();
        assert_eq!(schema["properties"]["From"]["type"], json!("object"));
        assert_eq!(schema["properties"]["To"]["type"], json!(["object", "null"]));
        assert_eq!(schema["properties"]["Via"], json!({"$ref": "#/properties/To"}));
    }

    #[test]
    fn test_nullable_wrapper_around_visited_type_admits_null() {
        let mut registry = ContractRegistry::new();
        let next = registry.register_nullable("Node").unwrap();
        registry
            .register(Contract::object(
                "Node",
                vec![
                    PropertyContract::new("Value", PrimitiveType::Int32).required(),
                    PropertyContract::new("Next", next),
                ],
            ))
            .unwrap();

        let schema = map_root(&registry, "Node", &bare()).unwrap();
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"]["Next"]["type"], json!(["object", "null"]));
        assert_eq!(
            schema["properties"]["Next"]["properties"]["Next"],
            json!({"$ref": "#/properties/Next"})
        );
    }

    #[test]
    fn test_nullable_wrapper_around_polymorphic_type() {
        use crate::contract::Discriminator;

        let mut registry = ContractRegistry::new();
        registry.register(Contract::object("Circle", vec![])).unwrap();
        registry
            .register(
                Contract::object("Shape", vec![])
                    .with_polymorphism(Polymorphism::default().variant("Circle", Some(Discriminator::from("circle")))),
            )
            .unwrap();
        let maybe = registry.register_nullable("Shape").unwrap();
        registry
            .register(Contract::object(
                "Canvas",
                vec![PropertyContract::new("Main", "Shape"), PropertyContract::new("Overlay", maybe)],
            ))
            .unwrap();

        let schema = map_root(&registry, "Canvas", &bare()).unwrap();
        let main = schema["properties"]["Main"]["anyOf"].as_array().unwrap();
        assert!(!main.contains(&json!({"type": "null"})));
        let overlay = schema["properties"]["Overlay"]["anyOf"].as_array().unwrap();
        assert_eq!(overlay.len(), 3);
        assert_eq!(overlay[2], json!({"type": "null"}));
    }

    #[test]
    fn test_empty_polymorphism_keys_follow_nullability() {
        let mut registry = ContractRegistry::new();
        registry
            .register(
                Contract::object("Plain", vec![PropertyContract::new("X", PrimitiveType::Int32)])
                    .with_polymorphism(Polymorphism::default()),
            )
            .unwrap();
        registry
            .register(Contract::object(
                "Holder",
                vec![PropertyContract::new("A", "Plain").nullable(), PropertyContract::new("B", "Plain")],
            ))
            .unwrap();

        let schema = map_root(&registry, "Holder", &bare()).unwrap();
        assert_eq!(schema["properties"]["A"]["type"], json!(["object", "null"]));
        assert_eq!(schema["properties"]["B"]["type"], json!("object"));
    }

    #[test]
    fn test_never_nullable_ignores_annotations() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object(
                "Person",
                vec![PropertyContract::new("Name", PrimitiveType::String).nullable()],
            ))
            .unwrap();

        let config = bare().with_reference_nullability(ReferenceNullability::NeverNullable);
        let schema = map_root(&registry, "Person", &config).unwrap();
        assert_eq!(schema["properties"]["Name"], json!({"type": "string"}));
    }

    #[test]
    fn test_always_nullable_skips_value_types() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object(
                "Person",
                vec![
                    PropertyContract::new("Name", PrimitiveType::String),
                    PropertyContract::new("Age", PrimitiveType::Int32),
                    PropertyContract::new("Extra", PrimitiveType::JsonValue),
                ],
            ))
            .unwrap();

        let config = bare().with_reference_nullability(ReferenceNullability::AlwaysNullable);
        let schema = map_root(&registry, "Person", &config).unwrap();
        assert_eq!(schema["type"], json!(["object", "null"]));
        assert_eq!(schema["properties"]["Name"], json!({"type": ["string", "null"]}));
        assert_eq!(schema["properties"]["Age"], json!({"type": "integer"}));
        assert_eq!(schema["properties"]["Extra"], json!({}));
    }

    #[test]
    fn test_ignored_and_extension_data_are_skipped() {
        let mut registry = ContractRegistry::new();
        registry.register_dictionary(PrimitiveType::JsonValue).unwrap();
        registry
            .register(Contract::object(
                "Poco",
                vec![
                    PropertyContract::new("Kept", PrimitiveType::Boolean),
                    PropertyContract::new("Hidden", PrimitiveType::String).ignored(),
                    PropertyContract::new("Overflow", "HashMap<String, JsonValue>").extension_data(),
                ],
            ))
            .unwrap();

        let schema = map_root(&registry, "Poco", &bare()).unwrap();
        assert_eq!(schema, json!({"type": "object", "properties": {"Kept": {"type": "boolean"}}}));
    }

    #[test]
    fn test_dictionary_values() {
        let mut registry = ContractRegistry::new();
        registry.register_dictionary(PrimitiveType::Uuid).unwrap();

        let schema = map_root(&registry, "HashMap<String, Uuid>", &bare()).unwrap();
        assert_eq!(
            schema,
            json!({"type": "object", "additionalProperties": {"type": "string", "format": "uuid"}})
        );
    }

    #[test]
    fn test_constructor_parameters_bind_to_properties() {
        use crate::contract::{ConstructorContract, ParameterContract};

        let mut registry = ContractRegistry::new();
        registry
            .register(
                Contract::object(
                    "Record",
                    vec![
                        PropertyContract::new("X", PrimitiveType::Int32),
                        PropertyContract::new("Y", PrimitiveType::Int32),
                        PropertyContract::new("Label", PrimitiveType::String),
                        PropertyContract::new("Note", PrimitiveType::String),
                    ],
                )
                .with_constructor(ConstructorContract::new(vec![
                    ParameterContract::new("x", PrimitiveType::Int32),
                    ParameterContract::new("y", PrimitiveType::Int32).with_default(json!(7)),
                    ParameterContract::new("label", PrimitiveType::String)
                        .nullable()
                        .with_description("Display label"),
                    ParameterContract::new("note", PrimitiveType::Int32),
                ])),
            )
            .unwrap();

        let schema = map_root(&registry, "Record", &bare()).unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "X": {"type": "integer"},
                    "Y": {"type": "integer", "default": 7},
                    "Label": {"description": "Display label", "type": ["string", "null"]},
                    "Note": {"type": "string"}
                },
                "required": ["X", "Label"]
            })
        );
    }

    #[test]
    fn test_description_sources() {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object("Inner", vec![]).with_description("An inner type"))
            .unwrap();
        registry
            .register(
                Contract::object(
                    "Outer",
                    vec![
                        PropertyContract::new("Plain", "Inner"),
                        PropertyContract::new("Described", PrimitiveType::Int32).with_description("A number"),
                    ],
                )
                .with_description("An outer type"),
            )
            .unwrap();

        let schema = map_root(&registry, "Outer", &bare()).unwrap();
        assert_eq!(schema["description"], json!("An outer type"));
        assert_eq!(schema["properties"]["Plain"]["description"], json!("An inner type"));
        assert_eq!(schema["properties"]["Described"]["description"], json!("A number"));

        let schema = map_root(&registry, "Outer", &bare().with_descriptions(false)).unwrap();
        assert!(schema.get("description").is_none());
        assert!(schema["properties"]["Described"].get("description").is_none());
    }

    #[test]
    fn test_polymorphic_dictionary_and_collection_variants() {
        use crate::contract::Discriminator;

        let mut registry = ContractRegistry::new();
        registry.register_array(PrimitiveType::Int32).unwrap();
        registry.register_dictionary(PrimitiveType::String).unwrap();
        registry
            .register(Contract::object("Base", vec![]).with_polymorphism(
                Polymorphism::default()
                    .variant("Vec<i32>", Some(Discriminator::from("list")))
                    .variant("HashMap<String, String>", Some(Discriminator::Integer(2))),
            ))
            .unwrap();

        let schema = map_root(&registry, "Base", &bare()).unwrap();
        assert_eq!(
            schema,
            json!({
                "anyOf": [
                    {"type": "object"},
                    {
                        "type": "object",
                        "properties": {
                            "$type": {"const": "list"},
                            "$values": {"type": "array", "items": {"type": "integer"}}
                        },
                        "required": ["$type", "$values"]
                    },
                    {
                        "type": "object",
                        "properties": {"$type": {"const": 2}},
                        "required": ["$type"],
                        "additionalProperties": {"type": "string"}
                    }
                ]
            })
        );
    }
}
