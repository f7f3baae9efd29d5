//! The contract a storage backend fulfils to take part in query compilation.
//!
//! A backend supplies one [`Field`] implementation per searchable attribute
//! and a [`FieldCatalog`] to find them by name. The core never looks inside
//! the [`Expression`] leaves those fields produce.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;
use metafield_core::Result;
use serde_json::Value;

use crate::expression::Expression;

/// A searchable field as seen by a backend.
///
/// Calling `equals` or `between` twice with the same arguments must produce
/// equal expressions. Values the backend cannot handle are rejected with
/// [`FieldError::InvalidQueryValue`](metafield_core::FieldError::InvalidQueryValue).
pub trait Field: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn equals(&self, value: &Value) -> Result<Expression>;

    fn between(&self, low: Option<&Value>, high: Option<&Value>) -> Result<Expression>;
}

impl<T: Field + ?Sized> Field for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn equals(&self, value: &Value) -> Result<Expression> {
        (**self).equals(value)
    }

    fn between(&self, low: Option<&Value>, high: Option<&Value>) -> Result<Expression> {
        (**self).between(low, high)
    }
}

impl<T: Field + ?Sized> Field for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn equals(&self, value: &Value) -> Result<Expression> {
        (**self).equals(value)
    }

    fn between(&self, low: Option<&Value>, high: Option<&Value>) -> Result<Expression> {
        (**self).between(low, high)
    }
}

/// Name → field resolution for one backend.
pub trait FieldCatalog {
    fn lookup(&self, name: &str) -> Option<&dyn Field>;
}

impl<F: Field> FieldCatalog for HashMap<String, F> {
    fn lookup(&self, name: &str) -> Option<&dyn Field> {
        self.get(name).map(|f| f as &dyn Field)
    }
}

impl<F: Field> FieldCatalog for BTreeMap<String, F> {
    fn lookup(&self, name: &str) -> Option<&dyn Field> {
        self.get(name).map(|f| f as &dyn Field)
    }
}

impl<F: Field> FieldCatalog for IndexMap<String, F> {
    fn lookup(&self, name: &str) -> Option<&dyn Field> {
        self.get(name).map(|f| f as &dyn Field)
    }
}
