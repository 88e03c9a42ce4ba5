use std::collections::{HashMap, HashSet};

use hane_api::{Fields, ParamKeys};
use serde::Deserialize;

use crate::error::EngineError;

/// Root configuration — parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HaneConfig {
    /// Names of the caller parameters converters react to.
    #[serde(default)]
    pub params: ParamKeys,

    /// Declarative converter definitions.
    #[serde(default)]
    pub converters: Vec<ConverterConfig>,
}

/// A converter variant described in configuration instead of code.
#[derive(Debug, Clone, Deserialize)]
pub struct ConverterConfig {
    pub name: String,
    /// Attributes to project, in output order. Empty = every attribute.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Attribute → output key.
    #[serde(default)]
    pub rename: HashMap<String, String>,
    /// Declared include names.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Resolvers for declared includes.
    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}

/// How one include is resolved: which attribute holds the related data and
/// which converter renders it.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationConfig {
    pub name: String,
    /// Attribute holding the related data. Defaults to `name`.
    #[serde(default)]
    pub attribute: Option<String>,
    /// Name of the converter used for the related data.
    pub converter: String,
    #[serde(default)]
    pub only: Vec<String>,
    #[serde(default)]
    pub wrap: Option<String>,
    #[serde(default)]
    pub attach: Fields,
}

impl RelationConfig {
    pub fn attribute(&self) -> &str {
        self.attribute.as_deref().unwrap_or(&self.name)
    }
}

impl HaneConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-references between converter definitions.
    ///
    /// A declared include without a relation is allowed here; it fails at
    /// conversion time, when (and if) a caller requests it.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut names = HashSet::new();
        for converter in &self.converters {
            if !names.insert(converter.name.as_str()) {
                return Err(EngineError::Config(format!(
                    "duplicate converter '{}'",
                    converter.name
                )));
            }
        }

        for converter in &self.converters {
            let mut relations = HashSet::new();
            for relation in &converter.relations {
                if !relations.insert(relation.name.as_str()) {
                    return Err(EngineError::Config(format!(
                        "converter '{}': duplicate relation '{}'",
                        converter.name, relation.name
                    )));
                }
                if !names.contains(relation.converter.as_str()) {
                    return Err(EngineError::Config(format!(
                        "converter '{}': relation '{}' uses unknown converter '{}'",
                        converter.name, relation.name, relation.converter
                    )));
                }
            }
        }
        Ok(())
    }
}
