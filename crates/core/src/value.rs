use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A document value after it has passed through a search field's converter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Double(f64),
    Integer(i64),
    Numeric(Decimal),
    DateTime(DateTime<Utc>),
    Object(Value),
}

impl TypedValue {
    /// Ordering used when picking range bounds.
    ///
    /// Same as `partial_cmp`, except doubles use IEEE total order so a NaN
    /// candidate still has a place (above every other value).
    pub fn bound_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::Double(a), TypedValue::Double(b)) => Some(a.total_cmp(b)),
            _ => self.partial_cmp(other),
        }
    }
}

/// Values only order against the same variant; objects never order.
impl PartialOrd for TypedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::String(a), TypedValue::String(b)) => a.partial_cmp(b),
            (TypedValue::Double(a), TypedValue::Double(b)) => a.partial_cmp(b),
            (TypedValue::Integer(a), TypedValue::Integer(b)) => a.partial_cmp(b),
            (TypedValue::Numeric(a), TypedValue::Numeric(b)) => a.partial_cmp(b),
            (TypedValue::DateTime(a), TypedValue::DateTime(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "{}", s),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Numeric(v) => write!(f, "{}", v),
            TypedValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            TypedValue::Object(v) => write!(f, "{}", v),
        }
    }
}
