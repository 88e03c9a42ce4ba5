/// Conversion failure. Both kinds are configuration or programming mistakes,
/// so conversion aborts and no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// An include was requested and declared, but the converter has no
    /// resolver registered for it.
    #[error("include resolver for '{include}' not implemented in {converter}")]
    ResolverNotFound { include: String, converter: String },

    /// Collection re-keying was requested and an item has no usable value
    /// for the key attribute (absent, null or empty).
    #[error("collection key '{key}' is not present in item {index}")]
    KeyFieldMissing { key: String, index: usize },
}

impl ConvertError {
    pub fn resolver_not_found(include: impl Into<String>, converter: impl Into<String>) -> Self {
        Self::ResolverNotFound {
            include: include.into(),
            converter: converter.into(),
        }
    }

    pub fn key_field_missing(key: impl Into<String>, index: usize) -> Self {
        Self::KeyFieldMissing {
            key: key.into(),
            index,
        }
    }
}
