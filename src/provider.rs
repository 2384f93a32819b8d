//! Contract providers
//!
//! The mapper never infers contracts itself. It asks a [`ContractProvider`]
//! for the contract of a type name, including nested element, value and
//! variant types. [`ContractRegistry`] is a provider backed by explicit
//! registration.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::contract::{Contract, ContractKind, TypeName};
use crate::error::{Result, SchemaError};
use crate::naming::NamingPolicy;
use crate::schema_type::PrimitiveType;

/// How the serializer treats repeated object references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceHandling {
    /// Values are written in full at every occurrence
    #[default]
    Ignore,
    /// Repeated objects are written as `$id`/`$ref` metadata
    Preserve,
}

/// Source of contracts for the mapper
pub trait ContractProvider {
    /// Resolve the contract of a type
    fn resolve(&self, type_name: &TypeName) -> Result<Arc<Contract>>;

    /// Whether contracts can no longer change
    fn is_finalized(&self) -> bool;

    fn reference_handling(&self) -> ReferenceHandling {
        ReferenceHandling::Ignore
    }
}

/// Contract provider populated by explicit registration.
///
/// Every built-in primitive is registered up front under its canonical name
/// (`i32`, `String`, `DateTime`, ...). The registry must be finalized before
/// schemas can be generated from it.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    contracts: HashMap<TypeName, Arc<Contract>>,
    property_naming: Option<NamingPolicy>,
    reference_handling: ReferenceHandling,
    finalized: bool,
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractRegistry {
    pub fn new() -> Self {
        let contracts = PrimitiveType::all()
            .map(|p| (TypeName::from(p), Arc::new(Contract::primitive(p))))
            .collect();

        Self {
            contracts,
            property_naming: None,
            reference_handling: ReferenceHandling::Ignore,
            finalized: false,
        }
    }

    /// Naming policy applied to properties without an explicit name
    pub fn with_property_naming(mut self, policy: NamingPolicy) -> Self {
        self.property_naming = Some(policy);
        self
    }

    pub fn with_reference_handling(mut self, handling: ReferenceHandling) -> Self {
        self.reference_handling = handling;
        self
    }

    /// Number of registered contracts, primitives included
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.contracts.contains_key(type_name)
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<Contract>> {
        self.contracts.get(type_name).cloned()
    }

    /// Register a contract, replacing any previous one of the same name
    pub fn register(&mut self, mut contract: Contract) -> Result<TypeName> {
        if self.finalized {
            return Err(SchemaError::Configuration(format!(
                "cannot register '{}': the registry is finalized",
                contract.type_name
            )));
        }

        if let (Some(policy), ContractKind::Object(object)) = (self.property_naming, &mut contract.kind) {
            for property in object.properties.iter_mut().filter(|p| !p.has_explicit_name) {
                property.name = policy.convert(&property.member_name);
            }
        }

        let type_name = contract.type_name.clone();
        tracing::trace!(%type_name, "registered contract");
        self.contracts.insert(type_name.clone(), Arc::new(contract));
        Ok(type_name)
    }

    /// Register `Option<T>`
    pub fn register_nullable(&mut self, element: impl Into<TypeName>) -> Result<TypeName> {
        let element = element.into();
        let name = format!("Option<{}>", element);
        self.register(Contract::nullable(name, element))
    }

    /// Register `Vec<T>`
    pub fn register_array(&mut self, element: impl Into<TypeName>) -> Result<TypeName> {
        let element = element.into();
        let name = format!("Vec<{}>", element);
        self.register(Contract::array(name, element))
    }

    /// Register `HashMap<String, T>`
    pub fn register_dictionary(&mut self, value: impl Into<TypeName>) -> Result<TypeName> {
        let value = value.into();
        let name = format!("HashMap<String, {}>", value);
        self.register(Contract::dictionary(name, value))
    }

    /// Validate and freeze the registry.
    ///
    /// Fails if a contract refers to an unregistered type or an object has
    /// an ambiguous deserialization constructor.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }

        let mut names: Vec<&TypeName> = self.contracts.keys().collect();
        names.sort();

        for name in names {
            let contract = &self.contracts[name];
            for referenced in contract.referenced_types() {
                if !self.contracts.contains_key(referenced) {
                    return Err(SchemaError::UnknownType(format!(
                        "{} (referenced by '{}')",
                        referenced, name
                    )));
                }
            }
            contract.deserialization_constructor()?;
        }

        tracing::debug!(contracts = self.contracts.len(), "contract registry finalized");
        self.finalized = true;
        Ok(())
    }
}

impl ContractProvider for ContractRegistry {
    fn resolve(&self, type_name: &TypeName) -> Result<Arc<Contract>> {
        self.contracts
            .get(type_name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn reference_handling(&self) -> ReferenceHandling {
        self.reference_handling
    }
}
