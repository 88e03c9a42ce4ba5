use std::sync::Arc;

use crate::value::{Fields, Value};

/// A domain object exposing named attributes.
///
/// Converters never query or load entities; they only read attributes off
/// data that is already in memory. Attributes are what collection re-keying
/// looks up, and what declarative transformers project from.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Entity, Clone)]
/// pub struct Post {
///     pub id: u64,
///     #[entity(rename = "headline")]
///     pub title: String,
///     #[entity(skip)]
///     pub secret: String,
/// }
/// ```
pub trait Entity {
    /// All attributes, in declaration order.
    fn attributes(&self) -> Fields;

    /// A single attribute by name. `None` when the entity has no such attribute.
    ///
    /// Derived entities report a field whose value cannot be serialized as
    /// `Some(Value::Null)`, never `None`; `attributes()` lists it as null too.
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes().remove(name)
    }
}

/// JSON objects are entities; any other JSON value has no attributes.
impl Entity for Value {
    fn attributes(&self) -> Fields {
        match self {
            Value::Object(map) => map.clone(),
            _ => Fields::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get(name)).cloned()
    }
}

impl Entity for Fields {
    fn attributes(&self) -> Fields {
        self.clone()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<T: Entity + ?Sized> Entity for &T {
    fn attributes(&self) -> Fields {
        (**self).attributes()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn attributes(&self) -> Fields {
        (**self).attributes()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}

impl<T: Entity + ?Sized> Entity for Arc<T> {
    fn attributes(&self) -> Fields {
        (**self).attributes()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}
