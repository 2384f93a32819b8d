//! Schema Mapper
//!
//! Generates JSON Schema (draft 2020-12) documents from serialization
//! contracts: structural descriptions of how a type is written to JSON.
//! The generated schema validates exactly the JSON the serializer produces.
//!
//! ## Features
//!
//! - **Contract driven**: shapes come from a [`ContractProvider`], never from inference
//! - **Cycle safe**: repeated and recursive types become `$ref` JSON pointers
//! - **Nullability**: `Option<T>` wrappers and annotated references admit `null`
//! - **Polymorphism**: derived variants become `anyOf` branches with discriminators
//! - **Callables**: parameter lists map to argument-object schemas
//!
//! ## Architecture
//!
//! ```text
//! schema_for_type / schema_for_callable
//!         │
//!         ▼
//! ContractProvider ──▶ ContractMapper ──▶ SchemaFields::build
//!                          │
//!                          ▼
//!                   GenerationState (path, depth, visited)
//! ```

pub mod builder;
pub mod callable;
pub mod config;
pub mod contract;
pub mod error;
pub mod generate;
pub mod mapper;
pub mod naming;
pub mod provider;
pub mod schema_type;
pub mod state;
pub mod weather;

pub use callable::CallableSignature;
pub use config::{MapperConfig, ReferenceNullability, Settings};
pub use contract::{
    ConstructorContract, Contract, ContractKind, Converter, Discriminator, EnumContract, EnumMember, Nullability,
    NumberHandling, ParameterContract, Polymorphism, PropertyContract, TypeName,
};
pub use error::{Result, SchemaError};
pub use generate::{schema_for_callable, schema_for_type};
pub use naming::NamingPolicy;
pub use provider::{ContractProvider, ContractRegistry, ReferenceHandling};
pub use schema_type::{PrimitiveType, SchemaType};

/// Dialect URI written to the root `$schema` keyword
pub const SCHEMA_VERSION: &str = "https://json-schema.org/draft/2020-12/schema";
