use std::sync::Arc;

use hane_api::entity::Entity;
use hane_api::value::{Fields, Value};
use hane_api::{ConversionInput, Includes, Transformer};

use crate::config::{ConverterConfig, HaneConfig, RelationConfig};
use crate::converter::Converter;
use crate::error::EngineError;

/// All converters defined in configuration, addressable by name.
#[derive(Debug)]
pub struct SchemaRegistry {
    converters: Vec<ConverterConfig>,
}

impl SchemaRegistry {
    pub fn new(config: &HaneConfig) -> Result<Arc<Self>, EngineError> {
        config.validate()?;
        tracing::debug!(converters = config.converters.len(), "schema registry built");
        Ok(Arc::new(Self {
            converters: config.converters.clone(),
        }))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.iter().map(|c| c.name.as_str())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.converters.iter().position(|c| c.name == name)
    }

    /// Transformer for the converter called `name`.
    pub fn transformer(self: &Arc<Self>, name: &str) -> Result<SchemaTransformer, EngineError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| EngineError::ConverterNotFound(name.to_string()))?;
        Ok(SchemaTransformer {
            registry: Arc::clone(self),
            index,
        })
    }
}

/// A converter variant over JSON entities, driven by a [`ConverterConfig`].
#[derive(Debug, Clone)]
pub struct SchemaTransformer {
    registry: Arc<SchemaRegistry>,
    index: usize,
}

impl SchemaTransformer {
    fn definition(&self) -> &ConverterConfig {
        &self.registry.converters[self.index]
    }

    fn output_key<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.definition()
            .rename
            .get(attribute)
            .map(String::as_str)
            .unwrap_or(attribute)
    }

    /// Nested converter for one relation of one entity.
    fn relation_converter(&self, relation: &RelationConfig, target: usize, entity: &Value) -> Converter<SchemaTransformer> {
        let related = entity.attribute(relation.attribute()).unwrap_or(Value::Null);
        let transformer = SchemaTransformer {
            registry: Arc::clone(&self.registry),
            index: target,
        };

        let converter = Converter::new(transformer, ConversionInput::from_json(related))
            .only(relation.only.iter().cloned());
        match &relation.wrap {
            Some(key) => converter.wrap(key.clone()).attach(relation.attach.clone()),
            None => converter,
        }
    }
}

impl Transformer for SchemaTransformer {
    type Entity = Value;

    fn to_fields(&self, entity: &Value) -> Fields {
        let definition = self.definition();
        if definition.fields.is_empty() {
            return entity
                .attributes()
                .into_iter()
                .map(|(name, value)| (self.output_key(&name).to_string(), value))
                .collect();
        }

        definition
            .fields
            .iter()
            .map(|name| {
                let value = entity.attribute(name).unwrap_or(Value::Null);
                (self.output_key(name).to_string(), value)
            })
            .collect()
    }

    fn includes(&self) -> Vec<&str> {
        self.definition().includes.iter().map(String::as_str).collect()
    }

    fn resolvers(&self) -> Includes<'_, Value> {
        let mut includes = Includes::new();
        for relation in &self.definition().relations {
            // Targets are checked when the registry is built.
            let Some(target) = self.registry.index_of(&relation.converter) else {
                continue;
            };
            includes.insert(relation.name.clone(), move |entity: &Value| {
                Box::new(self.relation_converter(relation, target, entity))
            });
        }
        includes
    }

    fn name(&self) -> &str {
        &self.definition().name
    }
}
