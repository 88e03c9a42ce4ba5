pub use serde_json::Value;

/// Ordered field mapping: the unit every entity is converted into.
///
/// Backed by `serde_json::Map` with `preserve_order`, so keys come out in
/// the order they were inserted.
pub type Fields = serde_json::Map<String, Value>;

/// Keep only the keys named in `only`, in the order of `fields`.
///
/// Names in `only` that `fields` does not contain are ignored.
pub fn retain_only(fields: Fields, only: &[String]) -> Fields {
    fields
        .into_iter()
        .filter(|(key, _)| only.iter().any(|name| name == key))
        .collect()
}

/// Merge `extra` into `fields` at the same level.
///
/// A key already present keeps its position and takes the new value.
pub fn merge(fields: &mut Fields, extra: Fields) {
    for (key, value) in extra {
        fields.insert(key, value);
    }
}

/// Render an attribute value as a mapping key.
///
/// Returns `None` for values that cannot key a collection: null and the
/// empty string. Strings are used verbatim, numbers and booleans by their
/// display form, arrays and objects by their compact JSON text.
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        compound => Some(compound.to_string()),
    }
}
