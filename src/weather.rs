//! Weather forecast model
//!
//! A small contract set shared by the `schema-mapper` binary and the
//! integration tests: a forecast with hourly entries and a string-encoded
//! weather enum, serialized with snake_case property names.

use serde_json::json;

use crate::callable::CallableSignature;
use crate::contract::{Contract, Converter, EnumContract, ParameterContract, PropertyContract};
use crate::error::Result;
use crate::naming::NamingPolicy;
use crate::provider::ContractRegistry;
use crate::schema_type::PrimitiveType;

/// Finalized registry holding `WeatherForecast` and its dependencies
pub fn weather_registry() -> Result<ContractRegistry> {
    let mut registry = ContractRegistry::new().with_property_naming(NamingPolicy::SnakeCaseLower);

    registry.register(
        Contract::enumeration("WeatherType", EnumContract::from_names(["Sunny", "Cloudy", "Rainy"]))
            .with_converter(Converter::StringEnum { naming_policy: None }),
    )?;

    registry.register(Contract::object(
        "HourlyForecast",
        vec![
            PropertyContract::new("Time", PrimitiveType::Time).required(),
            PropertyContract::new("Type", "WeatherType").required(),
            PropertyContract::new("TemperatureC", PrimitiveType::Int32).required(),
        ],
    ))?;

    let hourly = registry.register_array("HourlyForecast")?;

    registry.register(Contract::object(
        "WeatherForecast",
        vec![
            PropertyContract::new("LocationName", PrimitiveType::String).required(),
            PropertyContract::new("Date", PrimitiveType::Date).required(),
            PropertyContract::new("Summary", PrimitiveType::String).nullable(),
            PropertyContract::new("HourlyForecasts", hourly).nullable(),
        ],
    ))?;

    registry.finalize()?;
    Ok(registry)
}

/// Callable taking a forecast and an optional determination level
pub fn should_step_outside() -> CallableSignature {
    CallableSignature::new("should_step_outside")
        .with_description("An advanced algorithm that decides if I should go outside for a walk.")
        .parameter(ParameterContract::new("forecast", "WeatherForecast"))
        .parameter(ParameterContract::new("determination_level", PrimitiveType::Int32).with_default(json!(3)))
}
