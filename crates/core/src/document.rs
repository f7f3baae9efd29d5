use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A metadata document is an arbitrary nested JSON-like value.
pub type Document = Value;

/// One step of a [`FieldPath`]: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(i) => write!(f, "{}", i),
            PathKey::Key(k) => write!(f, "{}", k),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

/// Location of a value inside a [`Document`], e.g. `[properties, "eo:platform"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(pub Vec<PathKey>);

impl FieldPath {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shorthand for [`navigate`] with this path.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        navigate(document, &self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

/// Walk `document` one key at a time.
///
/// Returns `None` as soon as a step is missing: an unknown key, an index past
/// the end, a key applied to an array (or an index to an object), or a scalar
/// reached before the path is exhausted. Absence is never an error here.
///
/// An explicit `null` at the end of the path is returned as `Some(Value::Null)`;
/// callers decide whether that counts as present.
pub fn navigate<'a>(document: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    path.iter().try_fold(document, |current, key| match (current, key) {
        (Value::Object(map), PathKey::Key(k)) => map.get(k),
        (Value::Array(items), PathKey::Index(i)) => items.get(*i),
        _ => None,
    })
}
