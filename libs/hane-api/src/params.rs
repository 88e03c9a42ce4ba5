use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Names of the caller parameters a converter reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamKeys {
    /// Attribute name to re-key a collection by.
    pub collection_key: String,
    /// Comma-separated list of requested includes.
    pub include: String,
}

impl Default for ParamKeys {
    fn default() -> Self {
        Self {
            collection_key: "collection_key".to_string(),
            include: "include".to_string(),
        }
    }
}

/// Flat string parameters supplied by the caller (typically an HTTP query).
///
/// Read-only during conversion. Only the two keys named by [`ParamKeys`]
/// are interpreted; everything else is carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    entries: Vec<(String, String)>,
    keys: ParamKeys,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URL query string (`include=author&collection_key=id`).
    ///
    /// A leading `?` is skipped, `+` decodes to a space and percent escapes
    /// are decoded. A key without `=` is present with an empty value.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.set(decode(name), decode(value));
        }
        params
    }

    /// Use different parameter names for re-keying and includes.
    pub fn with_keys(mut self, keys: ParamKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn keys(&self) -> &ParamKeys {
        &self.keys
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == &name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Attribute to re-key collections by, if the caller asked for it.
    pub fn collection_key(&self) -> Option<&str> {
        self.get(&self.keys.collection_key)
    }

    /// Requested include names, if the caller asked for any.
    ///
    /// The raw value is trimmed as a whole and split on commas; individual
    /// entries are kept as given.
    pub fn requested_includes(&self) -> Option<Vec<&str>> {
        self.get(&self.keys.include)
            .map(|raw| raw.trim().split(',').collect())
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

fn decode(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
