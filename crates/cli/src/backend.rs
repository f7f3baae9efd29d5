//! Reference backend used by `metafield compile`.
//!
//! Produces expression leaves that carry the field name and the raw query
//! value unchanged, so compiled queries can be inspected without a store.

use indexmap::IndexMap;
use metafield_core::{FieldError, Result};
use metafield_fields::SearchField;
use metafield_query::{Expression, Field, FieldCatalog};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct InspectField {
    name: String,
    description: String,
}

impl InspectField {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Only scalars can be compared; arrays and mappings are rejected.
    fn scalar<'a>(&self, value: &'a Value) -> Result<&'a Value> {
        match value {
            Value::Array(_) | Value::Object(_) => Err(FieldError::InvalidQueryValue {
                field: self.name.clone(),
                reason: format!("expected a scalar, got {}", value),
            }),
            scalar => Ok(scalar),
        }
    }
}

impl Field for InspectField {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn equals(&self, value: &Value) -> Result<Expression> {
        let value = self.scalar(value)?;
        Ok(Expression::equality(self.name.clone(), value.clone()))
    }

    fn between(&self, low: Option<&Value>, high: Option<&Value>) -> Result<Expression> {
        let low = low.map(|v| self.scalar(v)).transpose()?;
        let high = high.map(|v| self.scalar(v)).transpose()?;
        Ok(Expression::between(
            self.name.clone(),
            low.cloned(),
            high.cloned(),
        ))
    }
}

/// One [`InspectField`] per declared search field.
#[derive(Debug, Clone, Default)]
pub struct InspectBackend {
    fields: IndexMap<String, InspectField>,
}

impl InspectBackend {
    pub fn from_search_fields(fields: &IndexMap<String, SearchField>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, field)| {
                    (name.clone(), InspectField::new(name.clone(), field.description()))
                })
                .collect(),
        }
    }
}

impl FieldCatalog for InspectBackend {
    fn lookup(&self, name: &str) -> Option<&dyn Field> {
        self.fields.get(name).map(|f| f as &dyn Field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metafield_fields::parse_search_field_value;
    use metafield_query::{to_expressions, Query};
    use serde_json::json;

    fn backend() -> InspectBackend {
        let mut fields = IndexMap::new();
        fields.insert(
            "platform".to_string(),
            parse_search_field_value(
                &json!({"offset": ["platform", "code"], "description": "Platform code"}),
                "platform",
            )
            .unwrap(),
        );
        InspectBackend::from_search_fields(&fields)
    }

    #[test]
    fn lookup_carries_description() {
        let backend = backend();
        let field = backend.lookup("platform").unwrap();
        assert_eq!(field.name(), "platform");
        assert_eq!(field.description(), "Platform code");
        assert!(backend.lookup("orbit").is_none());
    }

    #[test]
    fn compiles_scalars_and_ranges() {
        let query = Query::new().with(
            "platform",
            vec![json!("LANDSAT_8"), json!({"begin": "A", "end": "M"})],
        );
        let exprs = to_expressions(&backend(), &query).unwrap();
        assert_eq!(
            exprs[0].to_string(),
            r#"(platform = "LANDSAT_8" OR platform between "A" and "M")"#
        );
    }

    #[test]
    fn rejects_non_scalars() {
        let field = InspectField::new("platform", "");
        assert!(matches!(
            field.equals(&json!({"code": "x"})),
            Err(FieldError::InvalidQueryValue { .. })
        ));
        assert!(field.between(None, Some(&json!([1]))).is_err());
        assert!(field.between(None, None).is_ok());
    }
}
