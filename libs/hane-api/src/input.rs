use crate::value::Value;

/// Shape of the data handed to a converter. Decided once, before conversion
/// starts, and passed to the post-conversion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Opaque value, passed through untouched.
    Raw,
    /// Ordered sequence of entities of one kind.
    Collection,
    /// A single entity.
    Entity,
}

/// Data to convert.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionInput<E> {
    Raw(Value),
    Collection(Vec<E>),
    Entity(E),
}

impl<E> ConversionInput<E> {
    pub fn shape(&self) -> Shape {
        match self {
            ConversionInput::Raw(_) => Shape::Raw,
            ConversionInput::Collection(_) => Shape::Collection,
            ConversionInput::Entity(_) => Shape::Entity,
        }
    }
}

impl ConversionInput<Value> {
    /// Classify a JSON document by its structure: arrays are collections,
    /// objects are entities, everything else is raw.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => ConversionInput::Collection(items),
            Value::Object(_) => ConversionInput::Entity(value),
            other => ConversionInput::Raw(other),
        }
    }
}

impl<E> From<Vec<E>> for ConversionInput<E> {
    fn from(items: Vec<E>) -> Self {
        ConversionInput::Collection(items)
    }
}
