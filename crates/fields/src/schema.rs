//! Search field descriptors and the parser that turns them into extractors.
//!
//! A metadata definition declares its search fields under
//! `dataset.search_fields`:
//!
//! ```yaml
//! dataset:
//!   search_fields:
//!     platform:
//!       description: Platform code
//!       offset: [platform, code]
//!     lat:
//!       type: float-range
//!       min_offset: [[extent, coord, ll, lat], [extent, coord, lr, lat]]
//!       max_offset: [[extent, coord, ul, lat], [extent, coord, ur, lat]]
//! ```
//!
//! Parsing is all-or-nothing: the first bad descriptor fails the whole schema.

use indexmap::IndexMap;
use metafield_core::{navigate, FieldError, FieldPath, PathKey, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::converter::Converter;
use crate::field::{RangeField, SearchField, SimpleField};

const RANGE_SUFFIX: &str = "-range";

fn default_type_name() -> String {
    "string".to_string()
}

// ── Descriptor ──────────────────────────────────────────────────────

/// Declarative description of one search field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type", default = "default_type_name")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<FieldPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_offset: Option<Vec<FieldPath>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_offset: Option<Vec<FieldPath>>,
    #[serde(default)]
    pub description: String,
}

impl FieldDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            offset: None,
            min_offset: None,
            max_offset: None,
            description: String::new(),
        }
    }

    pub fn with_offset(mut self, offset: FieldPath) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_range(mut self, min_offset: Vec<FieldPath>, max_offset: Vec<FieldPath>) -> Self {
        self.min_offset = Some(min_offset);
        self.max_offset = Some(max_offset);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Deserialize a raw descriptor mapping for the field called `name`.
    pub fn from_value(value: &Value, name: &str) -> Result<Self> {
        FieldDescriptor::deserialize(value).map_err(|e| FieldError::InvalidDescriptor {
            field: name.to_string(),
            reason: e.to_string(),
        })
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Build the extractor described by `descriptor`.
///
/// - a table type (`string`, `double`, `integer`, `numeric`, `datetime`,
///   `object`) needs `offset` and yields a [`SimpleField`]
/// - `<base>-range` needs both `min_offset` and `max_offset` and yields a
///   [`RangeField`] using the base type's converter
///
/// `float-range` is accepted as `numeric-range`; a bare `float` is not.
pub fn parse_search_field(descriptor: &FieldDescriptor, name: &str) -> Result<SearchField> {
    let type_name = descriptor.type_name.as_str();

    if let Some(converter) = Converter::for_type_name(type_name) {
        let offset = descriptor
            .offset
            .clone()
            .ok_or_else(|| FieldError::MissingOffset {
                field: name.to_string(),
            })?;
        debug!(field = %name, type_name, offset = %offset, "parsed simple search field");
        return Ok(SimpleField::new(
            offset,
            converter,
            type_name,
            name,
            descriptor.description.clone(),
        )
        .into());
    }

    let unsupported = || FieldError::UnsupportedType {
        field: name.to_string(),
        type_name: type_name.to_string(),
    };

    let base = type_name.strip_suffix(RANGE_SUFFIX).ok_or_else(unsupported)?;
    let (base, canonical) = match base {
        "float" => ("numeric", "numeric-range"),
        other => (other, type_name),
    };
    let converter = Converter::for_type_name(base).ok_or_else(unsupported)?;

    let (min_offset, max_offset) = match (&descriptor.min_offset, &descriptor.max_offset) {
        (Some(min), Some(max)) => (min.clone(), max.clone()),
        _ => {
            return Err(FieldError::IncompleteRange {
                field: name.to_string(),
            })
        }
    };

    debug!(
        field = %name,
        type_name = canonical,
        min_paths = min_offset.len(),
        max_paths = max_offset.len(),
        "parsed range search field"
    );
    Ok(RangeField::new(
        min_offset,
        max_offset,
        converter,
        canonical,
        name,
        descriptor.description.clone(),
    )
    .into())
}

/// Deserialize and parse a raw descriptor in one step.
pub fn parse_search_field_value(value: &Value, name: &str) -> Result<SearchField> {
    let descriptor = FieldDescriptor::from_value(value, name)?;
    parse_search_field(&descriptor, name)
}

/// Build every search field declared at `dataset.search_fields`.
///
/// A definition without that section has no search fields. Order follows the
/// definition.
pub fn get_dataset_fields(metadata_definition: &Value) -> Result<IndexMap<String, SearchField>> {
    let path = [PathKey::from("dataset"), PathKey::from("search_fields")];
    let declared = match navigate(metadata_definition, &path) {
        None | Some(Value::Null) => return Ok(IndexMap::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(FieldError::InvalidDescriptor {
                field: "dataset.search_fields".to_string(),
                reason: format!("expected a mapping, got {}", other),
            })
        }
    };

    let mut fields = IndexMap::with_capacity(declared.len());
    for (name, raw) in declared {
        fields.insert(name.clone(), parse_search_field_value(raw, name)?);
    }

    debug!(count = fields.len(), "built dataset search fields");
    Ok(fields)
}
