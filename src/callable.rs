//! Callable signatures
//!
//! A [`CallableSignature`] describes a function's parameter list. Its schema
//! is the schema of a synthetic object with one property per parameter, which
//! is the JSON shape callers use to pass named arguments.

use crate::config::MapperConfig;
use crate::contract::{Contract, ContractKind, ObjectContract, ParameterContract, PropertyContract};
use crate::error::{Result, SchemaError};

/// Name and parameter list of a callable
#[derive(Debug, Clone)]
pub struct CallableSignature {
    pub name: String,
    pub description: Option<String>,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterContract>,
}

impl CallableSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterContract) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Check that the signature can be mapped
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SchemaError::InvalidArgument("callable name must not be empty".to_string()));
        }
        for (i, parameter) in self.parameters.iter().enumerate() {
            if parameter.name.is_empty() {
                return Err(SchemaError::InvalidArgument(format!(
                    "parameter {} of '{}' has no name",
                    i, self.name
                )));
            }
            if self.parameters[..i].iter().any(|p| p.name == parameter.name) {
                return Err(SchemaError::InvalidArgument(format!(
                    "duplicate parameter '{}' in '{}'",
                    parameter.name, self.name
                )));
            }
        }
        Ok(())
    }

    /// Synthesize the object contract of the argument list.
    ///
    /// Parameters without a default are required. A parameter that has both a
    /// description and a default gets the default appended to its description.
    pub fn to_contract(&self, config: &MapperConfig) -> Contract {
        let properties = self
            .parameters
            .iter()
            .map(|parameter| {
                let mut property = PropertyContract::new(parameter.name.as_str(), parameter.type_name.clone());
                property.has_explicit_name = true;
                property.is_required = !parameter.is_optional();
                property.nullability = parameter.nullability;
                property.default_value = parameter.default_value.clone();
                if config.resolve_descriptions {
                    property.description = match (&parameter.description, &parameter.default_value) {
                        (Some(description), Some(default)) => {
                            Some(format!("{} (default: {})", description, default))
                        }
                        (description, _) => description.clone(),
                    };
                }
                property
            })
            .collect();

        let mut contract = Contract::new(
            self.name.as_str(),
            ContractKind::Object(ObjectContract { properties, ..Default::default() }),
        )
        .value_type();
        if config.resolve_descriptions {
            contract.description = self.description.clone();
        }
        contract
    }
}
