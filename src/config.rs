//! Configuration management for schema generation
//!
//! [`MapperConfig`] is the immutable options record read by the mapper.
//! [`Settings`] wraps it for tools and supports loading from:
//! - Default values
//! - Config file (schema-mapper.toml)
//! - Environment variables (SCHEMA_MAPPER__*)
//!
//! ## Example config file (schema-mapper.toml):
//! ```toml
//! [mapper]
//! allow_schema_references = true
//! include_schema_version = true
//! resolve_descriptions = true
//! max_depth = 64
//! reference_nullability = "annotated"
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Whether schemas of reference-typed values admit `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceNullability {
    /// Every reference-typed schema is unioned with `null`
    AlwaysNullable,
    /// Only properties and parameters annotated as nullable admit `null`
    #[default]
    Annotated,
    /// Reference-typed schemas never admit `null`
    NeverNullable,
}

/// Options controlling schema generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Emit `$ref` pointers for repeated composite types.
    /// Should stay enabled if recursive types are expected.
    #[serde(default = "default_true")]
    pub allow_schema_references: bool,

    /// Emit `$schema` on the root document
    #[serde(default = "default_true")]
    pub include_schema_version: bool,

    /// Resolve type, property and parameter descriptions
    #[serde(default = "default_true")]
    pub resolve_descriptions: bool,

    /// Maximum depth of the generated document
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub reference_nullability: ReferenceNullability,
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    64
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            allow_schema_references: true,
            include_schema_version: true,
            resolve_descriptions: true,
            max_depth: default_max_depth(),
            reference_nullability: ReferenceNullability::default(),
        }
    }
}

impl MapperConfig {
    pub fn with_schema_references(mut self, allow: bool) -> Self {
        self.allow_schema_references = allow;
        self
    }

    pub fn with_schema_version(mut self, include: bool) -> Self {
        self.include_schema_version = include;
        self
    }

    pub fn with_descriptions(mut self, resolve: bool) -> Self {
        self.resolve_descriptions = resolve;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_reference_nullability(mut self, mode: ReferenceNullability) -> Self {
        self.reference_nullability = mode;
        self
    }
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Tool settings: mapper options plus output preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mapper: MapperConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Settings {
    /// Load settings, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-mapper.toml",
            ".schema-mapper.toml",
            "config/schema-mapper.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-mapper") {
            let xdg_config = config_dir.config_dir().join("schema-mapper.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_MAPPER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Render a document according to the output format
    pub fn render(&self, document: &serde_json::Value) -> Result<String> {
        Ok(match self.output.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(document)?,
            OutputFormat::Compact => serde_json::to_string(document)?,
        })
    }
}
