//! Backend-agnostic predicate trees.
//!
//! Backends construct [`Expression::Equality`] and [`Expression::Between`]
//! leaves from their [`Field`](crate::Field) implementations; the builder
//! only ever adds [`Expression::Or`] nodes on top. Backends consume a tree by
//! matching on it exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Equality {
        field: String,
        value: Value,
    },
    Between {
        field: String,
        low: Option<Value>,
        high: Option<Value>,
    },
    Or(Vec<Expression>),
}

impl Expression {
    pub fn equality(field: impl Into<String>, value: Value) -> Self {
        Expression::Equality {
            field: field.into(),
            value,
        }
    }

    pub fn between(field: impl Into<String>, low: Option<Value>, high: Option<Value>) -> Self {
        Expression::Between {
            field: field.into(),
            low,
            high,
        }
    }

    pub fn or(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Or(children.into_iter().collect())
    }

    /// Field names referenced anywhere in the tree, first occurrence first.
    pub fn fields(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_fields(&mut names);
        names
    }

    fn collect_fields<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Equality { field, .. } | Expression::Between { field, .. } => {
                if !names.contains(&field.as_str()) {
                    names.push(field);
                }
            }
            Expression::Or(children) => {
                for child in children {
                    child.collect_fields(names);
                }
            }
        }
    }
}

fn write_bound(f: &mut fmt::Formatter<'_>, bound: &Option<Value>) -> fmt::Result {
    match bound {
        Some(v) => write!(f, "{}", v),
        None => f.write_str("*"),
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Equality { field, value } => write!(f, "{} = {}", field, value),
            Expression::Between { field, low, high } => {
                write!(f, "{} between ", field)?;
                write_bound(f, low)?;
                f.write_str(" and ")?;
                write_bound(f, high)
            }
            Expression::Or(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}
