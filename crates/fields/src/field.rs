//! Search field extractors.
//!
//! A [`SearchField`] reads one logical attribute out of a metadata document:
//! - [`SimpleField`]: a single value at one path
//! - [`RangeField`]: a `(min, max)` bound aggregated over alternative paths
//!
//! Fields are immutable once built and safe to share across threads.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use metafield_core::{FieldError, FieldPath, Range, Result, TypedValue};
use serde::Serialize;
use serde_json::Value;

use crate::converter::Converter;

// ── Extracted values ────────────────────────────────────────────────

/// What a [`SearchField`] yields for a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchValue {
    Scalar(TypedValue),
    Range(Range<TypedValue>),
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchValue::Scalar(v) => write!(f, "{}", v),
            SearchValue::Range(r) => write!(f, "{}", r),
        }
    }
}

/// Present and non-null. Explicit nulls count as absent.
fn present<'a>(path: &FieldPath, document: &'a Value) -> Option<&'a Value> {
    path.resolve(document).filter(|v| !v.is_null())
}

// ── Simple field ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleField {
    offset: FieldPath,
    converter: Converter,
    type_name: String,
    name: String,
    description: String,
}

impl SimpleField {
    pub fn new(
        offset: FieldPath,
        converter: Converter,
        type_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            offset,
            converter,
            type_name: type_name.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// `Ok(None)` when the path is missing; `Err` when the value is present
    /// but cannot be converted.
    pub fn extract(&self, document: &Value) -> Result<Option<TypedValue>> {
        match present(&self.offset, document) {
            None => Ok(None),
            Some(raw) => self
                .converter
                .convert(raw)
                .map(Some)
                .map_err(|reason| extraction_error(&self.name, &self.type_name, reason)),
        }
    }
}

// ── Range field ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RangeField {
    min_offset: Vec<FieldPath>,
    max_offset: Vec<FieldPath>,
    converter: Converter,
    type_name: String,
    name: String,
    description: String,
}

impl RangeField {
    pub fn new(
        min_offset: Vec<FieldPath>,
        max_offset: Vec<FieldPath>,
        converter: Converter,
        type_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            min_offset,
            max_offset,
            converter,
            type_name: type_name.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Smallest of the values found at `min_offset`, largest of those at
    /// `max_offset`.
    ///
    /// If only one side matched, the other side of the range is left open.
    /// `Ok(None)` only when no path on either side matched.
    pub fn extract(&self, document: &Value) -> Result<Option<Range<TypedValue>>> {
        let mins = self.extract_raw(&self.min_offset, document)?;
        let maxs = self.extract_raw(&self.max_offset, document)?;

        if mins.is_empty() && maxs.is_empty() {
            return Ok(None);
        }

        let begin = self.pick(mins, Ordering::Less)?;
        let end = self.pick(maxs, Ordering::Greater)?;
        Ok(Some(Range::new(begin, end)))
    }

    fn extract_raw(&self, paths: &[FieldPath], document: &Value) -> Result<Vec<TypedValue>> {
        paths
            .iter()
            .filter_map(|path| present(path, document))
            .map(|raw| {
                self.converter
                    .convert(raw)
                    .map_err(|reason| extraction_error(&self.name, &self.type_name, reason))
            })
            .collect()
    }

    /// Keep the value that compares `wanted` against every other one
    /// (`Less` for the minimum, `Greater` for the maximum).
    fn pick(&self, values: Vec<TypedValue>, wanted: Ordering) -> Result<Option<TypedValue>> {
        let mut best: Option<TypedValue> = None;
        for value in values {
            best = match best {
                None => Some(value),
                Some(current) => match value.bound_cmp(&current) {
                    Some(ord) if ord == wanted => Some(value),
                    Some(_) => Some(current),
                    None => {
                        return Err(extraction_error(
                            &self.name,
                            &self.type_name,
                            "values are not comparable".to_string(),
                        ))
                    }
                },
            };
        }
        Ok(best)
    }
}

fn extraction_error(field: &str, type_name: &str, reason: String) -> FieldError {
    FieldError::Extraction {
        field: field.to_string(),
        type_name: type_name.to_string(),
        reason,
    }
}

// ── Search field ────────────────────────────────────────────────────

/// Either kind of extractor, as produced by
/// [`parse_search_field`](crate::schema::parse_search_field).
#[derive(Debug, Clone, PartialEq)]
pub enum SearchField {
    Simple(SimpleField),
    Range(RangeField),
}

impl SearchField {
    pub fn name(&self) -> &str {
        match self {
            SearchField::Simple(f) => &f.name,
            SearchField::Range(f) => &f.name,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            SearchField::Simple(f) => &f.type_name,
            SearchField::Range(f) => &f.type_name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            SearchField::Simple(f) => &f.description,
            SearchField::Range(f) => &f.description,
        }
    }

    pub fn converter(&self) -> Converter {
        match self {
            SearchField::Simple(f) => f.converter,
            SearchField::Range(f) => f.converter,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, SearchField::Range(_))
    }

    pub fn extract(&self, document: &Value) -> Result<Option<SearchValue>> {
        Ok(match self {
            SearchField::Simple(f) => f.extract(document)?.map(SearchValue::Scalar),
            SearchField::Range(f) => f.extract(document)?.map(SearchValue::Range),
        })
    }

    /// Convert a plain value (e.g. one stored alongside the document) the way
    /// this field converts document values.
    ///
    /// Range fields expect a `{begin, end}` mapping. `null` is absent.
    pub fn convert(&self, raw: &Value) -> Result<Option<SearchValue>> {
        if raw.is_null() {
            return Ok(None);
        }
        let converter = self.converter();
        let convert = |v: &Value| {
            converter
                .convert(v)
                .map_err(|reason| extraction_error(self.name(), self.type_name(), reason))
        };
        match self {
            SearchField::Simple(_) => convert(raw).map(|v| Some(SearchValue::Scalar(v))),
            SearchField::Range(_) => {
                let bounds = raw.as_object().ok_or_else(|| {
                    extraction_error(
                        self.name(),
                        self.type_name(),
                        "expected a {begin, end} mapping".to_string(),
                    )
                })?;
                let side = |key: &str| match bounds.get(key) {
                    None | Some(Value::Null) => Ok(None),
                    Some(v) => convert(v).map(Some),
                };
                Ok(Some(SearchValue::Range(Range::new(side("begin")?, side("end")?))))
            }
        }
    }
}

/// Extract every field of a schema from one document, in schema order.
///
/// Fields absent from the document are left out of the result. The first
/// conversion failure aborts the whole extraction.
pub fn extract_fields(
    fields: &IndexMap<String, SearchField>,
    document: &Value,
) -> Result<IndexMap<String, SearchValue>> {
    let mut values = IndexMap::with_capacity(fields.len());
    for (name, field) in fields {
        if let Some(value) = field.extract(document)? {
            values.insert(name.clone(), value);
        }
    }
    Ok(values)
}

impl From<SimpleField> for SearchField {
    fn from(field: SimpleField) -> Self {
        SearchField::Simple(field)
    }
}

impl From<RangeField> for SearchField {
    fn from(field: RangeField) -> Self {
        SearchField::Range(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lat_range() -> RangeField {
        RangeField::new(
            vec![
                FieldPath::new(["extent", "ul", "lat"]),
                FieldPath::new(["extent", "ll", "lat"]),
            ],
            vec![
                FieldPath::new(["extent", "ur", "lat"]),
                FieldPath::new(["extent", "lr", "lat"]),
            ],
            Converter::Integer,
            "integer-range",
            "lat",
            "Latitude range",
        )
    }

    #[test]
    fn simple_extracts_converted_value() {
        let field = SimpleField::new(
            FieldPath::new(["platform", "code"]),
            Converter::String,
            "string",
            "platform",
            "",
        );
        let doc = json!({"platform": {"code": "LANDSAT_8"}});
        assert_eq!(
            field.extract(&doc).unwrap(),
            Some(TypedValue::String("LANDSAT_8".into()))
        );
    }

    #[test]
    fn simple_absent_or_null_is_none() {
        let field = SimpleField::new(
            FieldPath::new(["cloud_cover"]),
            Converter::Double,
            "double",
            "cloud_cover",
            "",
        );
        assert_eq!(field.extract(&json!({})).unwrap(), None);
        assert_eq!(field.extract(&json!({"cloud_cover": null})).unwrap(), None);
    }

    #[test]
    fn simple_malformed_value_is_an_error() {
        let field = SimpleField::new(
            FieldPath::new(["orbit"]),
            Converter::Integer,
            "integer",
            "orbit",
            "",
        );
        let err = field.extract(&json!({"orbit": "abc"})).unwrap_err();
        assert!(matches!(
            err,
            FieldError::Extraction { ref field, ref type_name, .. }
                if field == "orbit" && type_name == "integer"
        ));
    }

    #[test]
    fn range_takes_min_of_mins_and_max_of_maxs() {
        let doc = json!({
            "extent": {
                "ul": {"lat": 5},
                "ll": {"lat": 3},
                "ur": {"lat": 10},
            }
        });
        assert_eq!(
            lat_range().extract(&doc).unwrap(),
            Some(Range::closed(TypedValue::Integer(3), TypedValue::Integer(10)))
        );
    }

    #[test]
    fn range_with_no_matches_is_none() {
        assert_eq!(lat_range().extract(&json!({"extent": {}})).unwrap(), None);
        assert_eq!(lat_range().extract(&json!("scalar")).unwrap(), None);
    }

    #[test]
    fn range_with_one_side_is_half_open() {
        let doc = json!({"extent": {"lr": {"lat": 8}}});
        assert_eq!(
            lat_range().extract(&doc).unwrap(),
            Some(Range::new(None, Some(TypedValue::Integer(8))))
        );
    }

    #[test]
    fn range_conversion_failure_propagates() {
        let doc = json!({"extent": {"ul": {"lat": "north"}, "ur": {"lat": 1}}});
        assert!(matches!(
            lat_range().extract(&doc),
            Err(FieldError::Extraction { .. })
        ));
    }

    #[test]
    fn object_range_values_are_not_comparable() {
        let field = RangeField::new(
            vec![FieldPath::new(["a"]), FieldPath::new(["b"])],
            vec![],
            Converter::Object,
            "object-range",
            "blob",
            "",
        );
        let doc = json!({"a": {"x": 1}, "b": {"x": 2}});
        let err = field.extract(&doc).unwrap_err();
        assert!(err.to_string().contains("not comparable"));
    }

    #[test]
    fn double_range_with_nan_candidate_still_extracts() {
        let field = RangeField::new(
            vec![FieldPath::new(["a"]), FieldPath::new(["b"])],
            vec![FieldPath::new(["a"])],
            Converter::Double,
            "double-range",
            "r",
            "",
        );
        let range = field.extract(&json!({"a": "NaN", "b": 3.0})).unwrap().unwrap();
        assert_eq!(range.begin, Some(TypedValue::Double(3.0)));
        assert!(matches!(range.end, Some(TypedValue::Double(v)) if v.is_nan()));
    }

    #[test]
    fn extract_fields_skips_absent() {
        let mut fields = IndexMap::new();
        fields.insert("lat".to_string(), SearchField::from(lat_range()));
        fields.insert(
            "orbit".to_string(),
            SimpleField::new(FieldPath::new(["orbit"]), Converter::Integer, "integer", "orbit", "")
                .into(),
        );
        let values = extract_fields(&fields, &json!({"orbit": 12})).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["orbit"], SearchValue::Scalar(TypedValue::Integer(12)));
    }

    #[test]
    fn convert_plain_values() {
        let field: SearchField = lat_range().into();
        assert_eq!(
            field.convert(&json!({"begin": 1, "end": "4"})).unwrap(),
            Some(SearchValue::Range(Range::closed(
                TypedValue::Integer(1),
                TypedValue::Integer(4)
            )))
        );
        assert_eq!(field.convert(&Value::Null).unwrap(), None);
        assert!(field.convert(&json!(3)).is_err());

        let orbit: SearchField =
            SimpleField::new(FieldPath::new(["orbit"]), Converter::Integer, "integer", "orbit", "")
                .into();
        assert_eq!(
            orbit.convert(&json!("12")).unwrap(),
            Some(SearchValue::Scalar(TypedValue::Integer(12)))
        );
    }

    #[test]
    fn search_value_display() {
        let range = SearchValue::Range(Range::new(Some(TypedValue::Integer(3)), None));
        assert_eq!(range.to_string(), "3 .. *");
        assert_eq!(SearchValue::Scalar(TypedValue::Double(1.5)).to_string(), "1.5");
    }

    #[test]
    fn extraction_is_repeatable() {
        let field: SearchField = lat_range().into();
        let doc = json!({"extent": {"ul": {"lat": 1}, "ur": {"lat": 2}}});
        let first = field.extract(&doc).unwrap();
        assert_eq!(first, field.extract(&doc).unwrap());
        assert!(matches!(first, Some(SearchValue::Range(_))));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn fields_are_send_and_sync() {
        assert_send_sync::<SearchField>();
        assert_send_sync::<SearchValue>();
    }

    #[test]
    fn shared_field_extracts_the_same_on_every_thread() {
        use std::sync::Arc;
        use std::thread;

        let field: Arc<SearchField> = Arc::new(lat_range().into());
        let doc = Arc::new(json!({"extent": {"ll": {"lat": -35}, "ur": {"lat": -33}}}));
        let expected = field.extract(&doc).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let field = Arc::clone(&field);
                let doc = Arc::clone(&doc);
                thread::spawn(move || field.extract(&doc).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
        assert!(expected.is_some());
    }
}
