//! Public entry points
//!
//! Both operations check their inputs and the provider up front, then run the
//! [`ContractMapper`] with a fresh [`GenerationState`]. No partial schema is
//! ever returned: any failure aborts the whole call.

use serde_json::Value;

use crate::callable::CallableSignature;
use crate::config::MapperConfig;
use crate::contract::{Nullability, TypeName};
use crate::error::{Result, SchemaError};
use crate::mapper::{ContractMapper, Site};
use crate::provider::{ContractProvider, ReferenceHandling};
use crate::state::GenerationState;

/// Generate the schema of a type known to `provider`
pub fn schema_for_type<P>(provider: &P, type_name: &str, config: &MapperConfig) -> Result<Value>
where
    P: ContractProvider + ?Sized,
{
    if type_name.is_empty() {
        return Err(SchemaError::InvalidArgument("type name must not be empty".to_string()));
    }
    ensure_ready(provider)?;

    let contract = provider.resolve(&TypeName::from(type_name))?;
    tracing::debug!(%type_name, ?config, "generating schema for type");

    let mut state = GenerationState::new(config);
    let site = Site::annotated(config.reference_nullability, Nullability::Oblivious);
    let node = ContractMapper::new(provider).map(&contract, &mut state, site)?;
    Ok(Value::Object(node))
}

/// Generate the schema of a callable's argument object.
///
/// The callable's name becomes the root `title` and its description the
/// root `description`.
pub fn schema_for_callable<P>(provider: &P, signature: &CallableSignature, config: &MapperConfig) -> Result<Value>
where
    P: ContractProvider + ?Sized,
{
    signature.validate()?;
    ensure_ready(provider)?;

    let contract = signature.to_contract(config);
    tracing::debug!(
        callable = %signature.name,
        parameters = signature.parameters.len(),
        "generating schema for callable"
    );

    let mut state = GenerationState::new(config);
    let site = Site {
        title: Some(signature.name.clone()),
        ..Default::default()
    };
    let node = ContractMapper::new(provider).map(&contract, &mut state, site)?;
    Ok(Value::Object(node))
}

fn ensure_ready<P>(provider: &P) -> Result<()>
where
    P: ContractProvider + ?Sized,
{
    if !provider.is_finalized() {
        return Err(SchemaError::NotReady);
    }
    if provider.reference_handling() == ReferenceHandling::Preserve {
        return Err(SchemaError::UnsupportedFeature(
            "schemas cannot be generated for reference-preserving serialization".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Contract, ParameterContract, PropertyContract};
    use crate::provider::ContractRegistry;
    use crate::schema_type::PrimitiveType;
    use serde_json::json;

    fn registry() -> ContractRegistry {
        let mut registry = ContractRegistry::new();
        registry
            .register(Contract::object("Point", vec![PropertyContract::new("X", PrimitiveType::Int32).required()]))
            .unwrap();
        registry
    }

    #[test]
    fn test_unfinalized_provider_is_not_ready() {
        let registry = registry();
        let err = schema_for_type(&registry, "Point", &MapperConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::NotReady));
    }

    #[test]
    fn test_empty_type_name() {
        let mut registry = registry();
        registry.finalize().unwrap();
        let err = schema_for_type(&registry, "", &MapperConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidArgument(_)));
    }

    #[test]
    fn test_reference_preservation_is_unsupported() {
        let mut registry = registry().with_reference_handling(ReferenceHandling::Preserve);
        registry.finalize().unwrap();

        let err = schema_for_type(&registry, "Point", &MapperConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFeature(_)));

        let signature = CallableSignature::new("f");
        let err = schema_for_callable(&registry, &signature, &MapperConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFeature(_)));
    }

    #[test]
    fn test_unknown_type() {
        let mut registry = registry();
        registry.finalize().unwrap();
        let err = schema_for_type(&registry, "Missing", &MapperConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType(_)));
    }

    #[test]
    fn test_root_schema_version() {
        let mut registry = registry();
        registry.finalize().unwrap();

        let schema = schema_for_type(&registry, "Point", &MapperConfig::default()).unwrap();
        assert_eq!(schema["$schema"], json!(crate::SCHEMA_VERSION));
        assert_eq!(schema.as_object().unwrap().keys().next().map(String::as_str), Some("$schema"));

        let schema = schema_for_type(&registry, "Point", &MapperConfig::default().with_schema_version(false)).unwrap();
        assert_eq!(
            schema,
            json!({"type": "object", "properties": {"X": {"type": "integer"}}, "required": ["X"]})
        );
    }

    #[test]
    fn test_callable_with_no_parameters() {
        let mut registry = registry();
        registry.finalize().unwrap();

        let signature = CallableSignature::new("ping");
        let schema = schema_for_callable(&registry, &signature, &MapperConfig::default().with_schema_version(false))
            .unwrap();
        assert_eq!(schema, json!({"title": "ping", "type": "object"}));
    }

    #[test]
    fn test_callable_parameter_order_and_title() {
        let mut registry = registry();
        registry.finalize().unwrap();

        let signature = CallableSignature::new("move_to")
            .with_description("Moves the cursor")
            .parameter(ParameterContract::new("target", "Point"))
            .parameter(ParameterContract::new("speed", PrimitiveType::Float64).with_default(json!(1.5)));

        let schema = schema_for_callable(&registry, &signature, &MapperConfig::default()).unwrap();
        let keys: Vec<&str> = schema.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["$schema", "title", "description", "type", "properties", "required"]);
        assert_eq!(schema["properties"]["speed"], json!({"type": "number", "default": 1.5}));
        assert_eq!(schema["required"], json!(["target"]));
    }
}
