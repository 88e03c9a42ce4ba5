use std::collections::HashMap;
use std::fmt;

use crate::error::ConvertError;
use crate::params::RequestParams;
use crate::value::{Fields, Value};

/// A converter variant: knows how to project one kind of entity into fields
/// and which related data it can include.
///
/// Only `to_fields` is required. A variant that supports includes declares
/// their names in `includes` and registers one resolver per name in
/// `resolvers`. The engine resolves an include only when the caller asked
/// for it and it is declared here.
///
/// ```ignore
/// struct PostTransformer;
///
/// impl Transformer for PostTransformer {
///     type Entity = Post;
///
///     fn to_fields(&self, post: &Post) -> Fields {
///         fields! { "id" => post.id, "title" => &post.title }
///     }
///
///     fn includes(&self) -> Vec<&str> {
///         vec!["author"]
///     }
///
///     fn resolvers(&self) -> Includes<'_, Post> {
///         Includes::new().with("author", |post: &Post| {
///             Box::new(Converter::entity(UserTransformer, post.author.clone()))
///         })
///     }
/// }
/// ```
pub trait Transformer: Send + Sync {
    type Entity;

    /// Base field mapping for one entity.
    fn to_fields(&self, entity: &Self::Entity) -> Fields;

    /// Include names this variant is willing to resolve.
    fn includes(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Resolver table for the declared includes.
    fn resolvers(&self) -> Includes<'_, Self::Entity> {
        Includes::new()
    }

    /// Name used in logs and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A ready-to-run conversion with its transformer erased, so that a resolver
/// can hand back a converter of any variant.
pub trait Convert {
    fn convert_boxed(self: Box<Self>, params: &RequestParams) -> Result<Value, ConvertError>;
}

/// Builds the nested conversion for one include of one entity.
pub type Resolver<'a, E> = Box<dyn Fn(&E) -> Box<dyn Convert + 'a> + 'a>;

/// Include name → resolver.
pub struct Includes<'a, E> {
    resolvers: HashMap<String, Resolver<'a, E>>,
}

impl<'a, E> Includes<'a, E> {
    pub fn new() -> Self {
        Self {
            resolvers: HashMap::new(),
        }
    }

    /// Builder form of [`Includes::insert`].
    pub fn with<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&E) -> Box<dyn Convert + 'a> + 'a,
    {
        self.insert(name, resolver);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, resolver: F)
    where
        F: Fn(&E) -> Box<dyn Convert + 'a> + 'a,
    {
        self.resolvers.insert(name.into(), Box::new(resolver));
    }

    pub fn get(&self, name: &str) -> Option<&Resolver<'a, E>> {
        self.resolvers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl<E> Default for Includes<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Includes<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.resolvers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Includes").field("names", &names).finish()
    }
}

/// Build a [`Fields`] mapping from `key => value` pairs, keeping their order.
///
/// Values go through `serde_json::to_value`, so anything serializable works.
/// A value that fails to serialize (a map with non-string keys, say) becomes
/// `null` rather than panicking, the same as a derived entity attribute.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::value::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut __fields = $crate::value::Fields::new();
        $(
            __fields.insert(
                ::std::string::String::from($key),
                $crate::__private::serde_json::to_value(&$value)
                    .unwrap_or($crate::value::Value::Null),
            );
        )+
        __fields
    }};
}
