//! Flat user queries: field name → value, range, or list of alternatives.

use indexmap::IndexMap;
use metafield_core::Range;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const RANGE_KEYS: [&str; 2] = ["begin", "end"];

/// The right-hand side of one query entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryTerm {
    Value(Value),
    Range(Range<Value>),
    /// Any of the alternatives (logical OR), in the given order.
    Any(Vec<QueryTerm>),
}

impl QueryTerm {
    /// Interpret a raw JSON/YAML value.
    ///
    /// Arrays become [`QueryTerm::Any`]; a mapping whose keys are only `begin`
    /// and/or `end` becomes [`QueryTerm::Range`] (a `null` side is open);
    /// anything else is a plain value.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => QueryTerm::Any(items.into_iter().map(QueryTerm::from_json).collect()),
            Value::Object(mut map)
                if !map.is_empty() && map.keys().all(|k| RANGE_KEYS.contains(&k.as_str())) =>
            {
                let begin = map.remove("begin").filter(|v| !v.is_null());
                let end = map.remove("end").filter(|v| !v.is_null());
                QueryTerm::Range(Range::new(begin, end))
            }
            other => QueryTerm::Value(other),
        }
    }
}

impl<'de> Deserialize<'de> for QueryTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(QueryTerm::from_json)
    }
}

impl From<Value> for QueryTerm {
    fn from(value: Value) -> Self {
        QueryTerm::from_json(value)
    }
}

impl From<&str> for QueryTerm {
    fn from(value: &str) -> Self {
        QueryTerm::Value(Value::from(value))
    }
}

impl From<String> for QueryTerm {
    fn from(value: String) -> Self {
        QueryTerm::Value(Value::from(value))
    }
}

impl From<i64> for QueryTerm {
    fn from(value: i64) -> Self {
        QueryTerm::Value(Value::from(value))
    }
}

impl From<i32> for QueryTerm {
    fn from(value: i32) -> Self {
        QueryTerm::Value(Value::from(value))
    }
}

impl From<f64> for QueryTerm {
    fn from(value: f64) -> Self {
        QueryTerm::Value(Value::from(value))
    }
}

impl From<bool> for QueryTerm {
    fn from(value: bool) -> Self {
        QueryTerm::Value(Value::from(value))
    }
}

impl<T: Into<Value>> From<Range<T>> for QueryTerm {
    fn from(range: Range<T>) -> Self {
        QueryTerm::Range(range.map(Into::into))
    }
}

impl<T: Into<QueryTerm>> From<Vec<T>> for QueryTerm {
    fn from(terms: Vec<T>) -> Self {
        QueryTerm::Any(terms.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping of field name to [`QueryTerm`].
///
/// Compilation follows insertion order, so the same query always yields the
/// same expression list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(IndexMap<String, QueryTerm>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated name replaces the earlier term in place.
    pub fn with(mut self, name: impl Into<String>, term: impl Into<QueryTerm>) -> Self {
        self.insert(name, term);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, term: impl Into<QueryTerm>) {
        self.0.insert(name.into(), term.into());
    }

    pub fn get(&self, name: &str) -> Option<&QueryTerm> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryTerm)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, T: Into<QueryTerm>> FromIterator<(K, T)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, term)| (name.into(), term.into()))
                .collect(),
        )
    }
}
